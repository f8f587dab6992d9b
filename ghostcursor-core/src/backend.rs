//! The seam between the trail state machine and whatever draws it.

use crate::config::LiveParams;
use crate::error::BackendError;
use crate::trail::Point;
use crate::viewport::Viewport;

/// Everything that changes per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms<'a> {
    /// Seconds since the renderer was mounted.
    pub time: f32,
    /// Smoothed pointer position, normalized, Y up.
    pub mouse: [f32; 2],
    pub opacity: f32,
    /// Trail history, newest first. Always exactly trail-length entries.
    pub trail: &'a [Point],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// Transient surface trouble (outdated swapchain, timeout); try again
    /// next frame.
    Skipped,
}

pub trait FrameBackend {
    /// Resize the surface and every pass's internal targets.
    fn resize(&mut self, viewport: &Viewport);

    /// Run the whole pass pipeline for one frame.
    fn render(&mut self, frame: &FrameUniforms<'_>) -> Result<FrameOutcome, BackendError>;

    /// Push live-updatable parameters into the uniforms.
    fn apply_live(&mut self, live: &LiveParams);

    /// Free every GPU resource. Called at most once.
    fn release(&mut self);
}
