//! Pointer tracking with inertia and idle fade.

use std::time::{Duration, Instant};

use crate::trail::{CENTER, Point};

/// Velocities with a squared magnitude at or below this no longer move the
/// smoothed position.
pub const VELOCITY_EPSILON_SQ: f32 = 1e-6;

/// Opacity at or below which an inactive pointer counts as fully faded.
pub const IDLE_OPACITY: f32 = 0.001;

/// Per-frame motion tunables, taken from the render config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub inertia: f32,
    pub fade_delay: Duration,
    pub fade_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct PointerState {
    target: Point,
    current: Point,
    velocity: [f32; 2],
    active: bool,
    last_move: Instant,
    opacity: f32,
}

impl PointerState {
    /// Inactive, centered, fully visible. The fade clock starts at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            target: CENTER,
            current: CENTER,
            velocity: [0.0, 0.0],
            active: false,
            last_move: now,
            opacity: 1.0,
        }
    }

    pub fn move_to(&mut self, p: Point, now: Instant) {
        self.target = p;
        self.active = true;
        self.last_move = now;
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    pub fn leave(&mut self, now: Instant) {
        self.active = false;
        self.last_move = now;
    }

    /// Advance one frame.
    pub fn step(&mut self, now: Instant, motion: &Motion) {
        if self.active {
            self.velocity = [
                self.target[0] - self.current[0],
                self.target[1] - self.current[1],
            ];
            self.current = self.target;
            self.opacity = 1.0;
            return;
        }

        self.velocity[0] *= motion.inertia;
        self.velocity[1] *= motion.inertia;
        let [vx, vy] = self.velocity;
        if vx * vx + vy * vy > VELOCITY_EPSILON_SQ {
            self.current[0] += vx;
            self.current[1] += vy;
        }

        let idle_for = now.saturating_duration_since(self.last_move);
        if idle_for > motion.fade_delay {
            let k = if motion.fade_duration.is_zero() {
                1.0
            } else {
                ((idle_for - motion.fade_delay).as_secs_f32()
                    / motion.fade_duration.as_secs_f32())
                .min(1.0)
            };
            self.opacity = (1.0 - k).max(0.0);
            // Snap the tail of the fade so an idle pointer is fully clear.
            if self.opacity <= IDLE_OPACITY {
                self.opacity = 0.0;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inactive and faded out; nothing left to draw.
    pub fn is_idle(&self) -> bool {
        !self.active && self.opacity <= IDLE_OPACITY
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn velocity(&self) -> [f32; 2] {
        self.velocity
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn last_move(&self) -> Instant {
        self.last_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion() -> Motion {
        Motion {
            inertia: 0.5,
            fade_delay: Duration::from_millis(100),
            fade_duration: Duration::from_millis(200),
        }
    }

    #[test]
    fn test_active_snaps_to_target() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.move_to([0.9, 0.1], t0);
        p.step(t0, &motion());
        assert_eq!(p.current(), [0.9, 0.1]);
        assert!((p.velocity()[0] - 0.4).abs() < 1e-6);
        assert!((p.velocity()[1] + 0.4).abs() < 1e-6);
        assert_eq!(p.opacity(), 1.0);
    }

    #[test]
    fn test_inertia_keeps_drifting_after_leave() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.move_to([0.9, 0.5], t0);
        p.step(t0, &motion());
        p.leave(t0);
        p.step(t0, &motion());
        // 0.4 * 0.5 = 0.2 added on top of the snapped position
        assert!((p.current()[0] - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_tiny_velocity_stops_moving() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.move_to([0.5005, 0.5], t0);
        p.step(t0, &motion());
        p.leave(t0);
        let before = p.current();
        p.step(t0, &motion());
        assert_eq!(p.current(), before);
    }

    #[test]
    fn test_fade_is_linear_after_delay() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        p.step(t0 + Duration::from_millis(100), &motion());
        assert_eq!(p.opacity(), 1.0);
        p.step(t0 + Duration::from_millis(200), &motion());
        assert!((p.opacity() - 0.5).abs() < 1e-3);
        p.step(t0 + Duration::from_millis(400), &motion());
        assert_eq!(p.opacity(), 0.0);
        assert!(p.is_idle());
    }

    #[test]
    fn test_zero_duration_fades_instantly() {
        let t0 = Instant::now();
        let mut p = PointerState::new(t0);
        let m = Motion {
            fade_duration: Duration::ZERO,
            ..motion()
        };
        p.step(t0 + Duration::from_millis(101), &m);
        assert_eq!(p.opacity(), 0.0);
    }
}
