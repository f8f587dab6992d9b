//! Frame loop state.
//!
//! The scheduler does not own a timer. The host supplies ticks (one per
//! `request_frame`), and the scheduler only decides whether another tick is
//! wanted. `Halted` is terminal: teardown and context loss both end there.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No tick pending; the next qualifying input restarts the loop.
    Idle,
    /// A tick is pending or being processed.
    Running,
    /// Never schedules again.
    Halted,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: LoopState,
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Returns `true` when the loop was idle and the caller must request a
    /// tick from the host.
    pub fn start(&mut self) -> bool {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                tracing::debug!("frame loop started");
                true
            }
            LoopState::Running | LoopState::Halted => false,
        }
    }

    /// Stop scheduling; a tick that still arrives is ignored.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Idle;
            tracing::debug!(frames = self.frames, "frame loop idle");
        }
    }

    pub fn halt(&mut self) {
        self.state = LoopState::Halted;
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Count a processed tick.
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_requests_once() {
        let mut s = FrameScheduler::new();
        assert!(s.start());
        assert!(!s.start());
        assert!(s.is_running());
    }

    #[test]
    fn test_stop_then_restart() {
        let mut s = FrameScheduler::new();
        s.start();
        s.stop();
        assert_eq!(s.state(), LoopState::Idle);
        assert!(s.start());
    }

    #[test]
    fn test_halt_is_terminal() {
        let mut s = FrameScheduler::new();
        s.start();
        s.halt();
        assert!(!s.start());
        s.stop();
        assert_eq!(s.state(), LoopState::Halted);
    }
}
