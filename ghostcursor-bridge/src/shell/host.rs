//! `OverlayHost` for a winit window.
//!
//! The overlay is the window's whole surface, so "stacking context" maps to
//! the window level: the z-index decides whether the window floats above or
//! sinks below other windows, and detaching puts the old level back.

use std::sync::Arc;
use std::time::Instant;

use ghostcursor_core::{OverlayHost, OverlayLayer};
use winit::window::{Window, WindowLevel};

/// z-index at or above which the overlay window floats on top.
pub const ALWAYS_ON_TOP_Z: i32 = 1000;

pub fn window_level_for(z_index: i32) -> WindowLevel {
    if z_index < 0 {
        WindowLevel::AlwaysOnBottom
    } else if z_index >= ALWAYS_ON_TOP_Z {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

pub struct WindowHost {
    window: Arc<Window>,
    touch: bool,
    /// Last level we set. winit cannot report the current one.
    level: WindowLevel,
}

impl WindowHost {
    pub fn new(window: Arc<Window>, touch: bool) -> Self {
        Self {
            window,
            touch,
            level: WindowLevel::Normal,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl OverlayHost for WindowHost {
    type Restore = WindowLevel;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn logical_size(&self) -> (f64, f64) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (size.width, size.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn is_touch(&self) -> bool {
        self.touch
    }

    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    fn attach_overlay(&mut self, layer: &OverlayLayer) -> WindowLevel {
        let previous = self.level;
        let level = window_level_for(layer.z_index);
        if level != previous {
            self.window.set_window_level(level);
            self.level = level;
        }
        tracing::debug!(z_index = layer.z_index, ?level, blend = %layer.blend_mode, "overlay attached");
        previous
    }

    fn update_overlay(&mut self, layer: &OverlayLayer) {
        // Blending happens in the composite shader; nothing to do on the
        // window itself.
        tracing::debug!(blend = %layer.blend_mode, "overlay blend mode changed");
    }

    fn detach_overlay(&mut self, restore: WindowLevel) {
        if restore != self.level {
            self.window.set_window_level(restore);
            self.level = restore;
        }
        tracing::debug!(level = ?restore, "overlay detached");
    }
}
