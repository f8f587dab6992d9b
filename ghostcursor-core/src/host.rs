//! The surface the overlay lives on.
//!
//! A host is whatever the renderer is mounted into: a window, a canvas, a
//! test double. It supplies the clock, the size, and the frame primitive,
//! and it owns the visible layer the backend draws into.

use std::time::Instant;

use crate::blend::BlendMode;

/// How the overlay sits on top of the host's own content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayer {
    pub z_index: i32,
    pub blend_mode: BlendMode,
}

pub trait OverlayHost {
    /// Whatever `attach_overlay` changed on the host, handed back to
    /// `detach_overlay` so it can be put back.
    type Restore;

    /// Monotonic clock used for fade timing and the shader's time uniform.
    fn now(&self) -> Instant;

    /// Host size in logical pixels.
    fn logical_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Touch-first devices get a smaller pixel budget and a quicker fade.
    fn is_touch(&self) -> bool {
        false
    }

    /// Ask for exactly one `tick` on the next frame.
    fn request_frame(&mut self);

    /// Show the overlay layer and establish the stacking context it needs.
    fn attach_overlay(&mut self, layer: &OverlayLayer) -> Self::Restore;

    /// Layer properties changed after attach (blend mode is live).
    fn update_overlay(&mut self, _layer: &OverlayLayer) {}

    /// Remove the overlay and undo whatever `attach_overlay` changed.
    fn detach_overlay(&mut self, restore: Self::Restore);
}
