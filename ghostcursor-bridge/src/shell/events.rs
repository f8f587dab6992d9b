//! Winit event handling.
//!
//! Translates WindowEvent into overlay input:
//!   CursorMoved / CursorEntered / CursorLeft → pointer move, enter, leave
//!   Touch started/moved                     → pointer move
//!   Touch ended/cancelled                   → pointer leave
//!   Resized / ScaleFactorChanged            → viewport recompute
//!   RedrawRequested                         → tick (or repaint when idle)
//!   Escape / CloseRequested                 → teardown and exit

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};

use super::app::{GhostcursorApp, TrailRenderer};

/// Pointer-level meaning of a platform input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Logical pixels, origin top-left.
    Move(f64, f64),
    Enter,
    Leave,
}

/// A finger behaves like a pointer that leaves when lifted.
pub fn touch_action(phase: TouchPhase, logical: (f64, f64)) -> PointerAction {
    match phase {
        TouchPhase::Started | TouchPhase::Moved => PointerAction::Move(logical.0, logical.1),
        TouchPhase::Ended | TouchPhase::Cancelled => PointerAction::Leave,
    }
}

pub fn apply_pointer(renderer: &mut TrailRenderer, action: PointerAction) {
    match action {
        PointerAction::Move(x, y) => renderer.on_pointer_move(x, y),
        PointerAction::Enter => renderer.on_pointer_enter(),
        PointerAction::Leave => renderer.on_pointer_leave(),
    }
}

fn to_logical(app: &GhostcursorApp, position: PhysicalPosition<f64>) -> (f64, f64) {
    let scale = app.window.as_ref().map_or(1.0, |w| w.scale_factor());
    let p = position.to_logical::<f64>(scale);
    (p.x, p.y)
}

pub fn handle_window_event(app: &mut GhostcursorApp, event_loop: &ActiveEventLoop, event: WindowEvent) {
    let action = match event {
        // ── Window lifecycle ──────────────────────────────────────
        WindowEvent::CloseRequested => {
            tracing::info!("Window close requested");
            app.shutdown();
            event_loop.exit();
            return;
        }

        WindowEvent::KeyboardInput { event, .. } => {
            if event.state == ElementState::Pressed && event.logical_key == Key::Named(NamedKey::Escape) {
                app.shutdown();
                event_loop.exit();
            }
            return;
        }

        // ── Resize ───────────────────────────────────────────────
        WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
            app.resize_overlay();
            return;
        }

        // ── Frame ────────────────────────────────────────────────
        WindowEvent::RedrawRequested => {
            if let Some(renderer) = app.renderer.as_mut() {
                if !renderer.tick() {
                    renderer.repaint();
                }
            }
            return;
        }

        // ── Pointer ──────────────────────────────────────────────
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical(app, position);
            PointerAction::Move(x, y)
        }
        WindowEvent::CursorEntered { .. } => PointerAction::Enter,
        WindowEvent::CursorLeft { .. } => PointerAction::Leave,
        WindowEvent::Touch(touch) => {
            app.note_touch();
            touch_action(touch.phase, to_logical(app, touch.location))
        }

        _ => return,
    };

    if let Some(renderer) = app.renderer.as_mut() {
        apply_pointer(renderer, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_start_and_move_are_moves() {
        assert_eq!(
            touch_action(TouchPhase::Started, (10.0, 20.0)),
            PointerAction::Move(10.0, 20.0)
        );
        assert_eq!(
            touch_action(TouchPhase::Moved, (1.5, 2.5)),
            PointerAction::Move(1.5, 2.5)
        );
    }

    #[test]
    fn test_touch_end_and_cancel_are_leaves() {
        assert_eq!(touch_action(TouchPhase::Ended, (0.0, 0.0)), PointerAction::Leave);
        assert_eq!(touch_action(TouchPhase::Cancelled, (0.0, 0.0)), PointerAction::Leave);
    }
}
