//! The pointer-trail renderer: input handling, per-frame update, idle
//! suspend, live reconfiguration and teardown.
//!
//! Everything here runs on one thread. Input handlers and `tick` are called
//! from the host's event dispatch and never overlap, so the trail and the
//! pointer state need no locking. Resize only touches the viewport and the
//! backend's targets.

use std::fmt;
use std::time::Instant;

use crate::backend::{FrameBackend, FrameOutcome, FrameUniforms};
use crate::blend::BlendMode;
use crate::color::Rgb;
use crate::config::{LiveParams, RenderConfig, RenderOptions};
use crate::host::{OverlayHost, OverlayLayer};
use crate::pointer::{Motion, PointerState};
use crate::scheduler::{FrameScheduler, LoopState};
use crate::trail::{Point, TrailBuffer};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    /// Backend up, overlay attached.
    Active,
    /// The backend could not be created. Nothing is drawn, ever.
    Degraded,
    /// The backend reported a fatal error mid-session.
    ContextLost,
    TornDown,
}

pub struct PointerTrailRenderer<H: OverlayHost, B: FrameBackend> {
    host: H,
    backend: Option<B>,
    restore: Option<H::Restore>,
    config: RenderConfig,
    viewport: Viewport,
    trail: TrailBuffer,
    history: Vec<Point>,
    pointer: PointerState,
    scheduler: FrameScheduler,
    started: Instant,
    elapsed: f32,
    status: RendererStatus,
}

impl<H: OverlayHost, B: FrameBackend> PointerTrailRenderer<H, B> {
    /// Resolve `options` against the host's input device, then mount.
    pub fn mount_with_options<F, E>(host: H, options: &RenderOptions, factory: F) -> Self
    where
        F: FnOnce(&Viewport, &RenderConfig) -> Result<B, E>,
        E: fmt::Display,
    {
        let config = options.resolve(host.is_touch());
        Self::mount(host, config, factory)
    }

    /// Build the renderer. A failing `factory` leaves a degraded instance
    /// that renders nothing; it is never an error for the host.
    pub fn mount<F, E>(mut host: H, config: RenderConfig, factory: F) -> Self
    where
        F: FnOnce(&Viewport, &RenderConfig) -> Result<B, E>,
        E: fmt::Display,
    {
        let (w, h) = host.logical_size();
        let viewport = Viewport::compute(
            w,
            h,
            host.device_pixel_ratio(),
            config.max_device_pixel_ratio,
            config.target_pixels,
        );

        let (backend, restore, status) = match factory(&viewport, &config) {
            Ok(backend) => {
                let restore = host.attach_overlay(&OverlayLayer {
                    z_index: config.z_index,
                    blend_mode: config.blend_mode,
                });
                tracing::info!(
                    width = viewport.width,
                    height = viewport.height,
                    pixel_ratio = viewport.pixel_ratio,
                    trail = config.trail_length,
                    "pointer trail mounted"
                );
                (Some(backend), Some(restore), RendererStatus::Active)
            }
            Err(e) => {
                tracing::warn!("pointer trail disabled, no rendering context: {e}");
                (None, None, RendererStatus::Degraded)
            }
        };

        let trail = TrailBuffer::new(config.trail_length);
        let history = trail.history();
        let started = host.now();

        let mut renderer = Self {
            host,
            backend,
            restore,
            config,
            viewport,
            trail,
            history,
            pointer: PointerState::new(started),
            scheduler: FrameScheduler::new(),
            started,
            elapsed: 0.0,
            status,
        };
        renderer.ensure_loop();
        renderer
    }

    // ── Input ────────────────────────────────────────────────────

    /// Pointer moved to `(x, y)` in host logical pixels, origin top-left.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if self.status == RendererStatus::TornDown {
            return;
        }
        let (w, h) = self.host.logical_size();
        let nx = (x / w.max(1.0)).clamp(0.0, 1.0) as f32;
        let ny = (1.0 - y / h.max(1.0)).clamp(0.0, 1.0) as f32;
        let now = self.host.now();
        self.pointer.move_to([nx, ny], now);
        self.ensure_loop();
    }

    pub fn on_pointer_enter(&mut self) {
        if self.status == RendererStatus::TornDown {
            return;
        }
        self.pointer.enter();
        self.ensure_loop();
    }

    pub fn on_pointer_leave(&mut self) {
        if self.status == RendererStatus::TornDown {
            return;
        }
        let now = self.host.now();
        self.pointer.leave(now);
        self.ensure_loop();
    }

    /// Host resized to `width x height` logical pixels. Returns whether the
    /// internal resolution changed.
    pub fn on_resize(&mut self, width: f64, height: f64) -> bool {
        if self.status == RendererStatus::TornDown {
            return false;
        }
        let next = Viewport::compute(
            width,
            height,
            self.host.device_pixel_ratio(),
            self.config.max_device_pixel_ratio,
            self.config.target_pixels,
        );
        if next == self.viewport {
            return false;
        }
        tracing::debug!(
            width = next.width,
            height = next.height,
            scale = next.budget_scale,
            "pointer trail resized"
        );
        self.viewport = next;
        if self.status == RendererStatus::Active {
            if let Some(backend) = self.backend.as_mut() {
                backend.resize(&self.viewport);
            }
        }
        true
    }

    // ── Frame loop ───────────────────────────────────────────────

    /// Process one scheduled frame. Returns `false` when no frame was due
    /// (loop idle, halted, or torn down).
    pub fn tick(&mut self) -> bool {
        if !self.scheduler.is_running() {
            return false;
        }

        let now = self.host.now();
        let motion = Motion {
            inertia: self.config.inertia,
            fade_delay: self.config.fade_delay,
            fade_duration: self.config.fade_duration,
        };
        self.pointer.step(now, &motion);
        self.trail.push(self.pointer.current());
        self.trail.write_history(&mut self.history);
        self.elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        self.scheduler.record_frame();

        if !self.draw() {
            return true;
        }

        if self.pointer.is_idle() {
            self.scheduler.stop();
        } else {
            self.host.request_frame();
        }
        true
    }

    /// Draw the last frame again without advancing anything. For hosts that
    /// need their surface refreshed while the loop is idle.
    pub fn repaint(&mut self) {
        if self.status == RendererStatus::Active {
            self.draw();
        }
    }

    fn draw(&mut self) -> bool {
        let Some(backend) = self.backend.as_mut() else {
            return true;
        };
        let frame = FrameUniforms {
            time: self.elapsed,
            mouse: self.pointer.current(),
            opacity: self.pointer.opacity(),
            trail: &self.history,
        };
        match backend.render(&frame) {
            Ok(FrameOutcome::Presented) => true,
            Ok(FrameOutcome::Skipped) => {
                tracing::debug!("frame skipped");
                true
            }
            Err(e) => {
                tracing::error!("pointer trail stopped: {e}");
                self.status = RendererStatus::ContextLost;
                self.scheduler.halt();
                false
            }
        }
    }

    fn ensure_loop(&mut self) {
        if self.status == RendererStatus::Active && self.scheduler.start() {
            self.host.request_frame();
        }
    }

    // ── Live reconfiguration ─────────────────────────────────────

    pub fn set_color(&mut self, color: Rgb) {
        let mut live = self.config.live_params();
        live.color = color;
        self.apply_live(live);
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        let mut live = self.config.live_params();
        live.brightness = brightness.max(0.0);
        self.apply_live(live);
    }

    pub fn set_edge_intensity(&mut self, edge_intensity: f32) {
        let mut live = self.config.live_params();
        live.edge_intensity = edge_intensity.max(0.0);
        self.apply_live(live);
    }

    pub fn set_grain_intensity(&mut self, grain_intensity: f32) {
        let mut live = self.config.live_params();
        live.grain_intensity = grain_intensity.max(0.0);
        self.apply_live(live);
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        let mut live = self.config.live_params();
        live.blend_mode = blend_mode;
        self.apply_live(live);
    }

    pub fn apply_live(&mut self, live: LiveParams) {
        if self.status == RendererStatus::TornDown {
            return;
        }
        let blend_changed = live.blend_mode != self.config.blend_mode;
        self.config.apply_live(&live);

        if let Some(backend) = self.backend.as_mut() {
            backend.apply_live(&live);
        }
        if blend_changed && self.restore.is_some() {
            self.host.update_overlay(&OverlayLayer {
                z_index: self.config.z_index,
                blend_mode: live.blend_mode,
            });
        }
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Cancel the pending tick, release the backend and detach the overlay.
    /// Safe on a degraded instance; a second call does nothing.
    pub fn teardown(&mut self) {
        if self.status == RendererStatus::TornDown {
            return;
        }
        self.scheduler.halt();
        if let Some(mut backend) = self.backend.take() {
            backend.release();
        }
        if let Some(restore) = self.restore.take() {
            self.host.detach_overlay(restore);
        }
        self.status = RendererStatus::TornDown;
        tracing::info!(frames = self.scheduler.frames(), "pointer trail torn down");
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn status(&self) -> RendererStatus {
        self.status
    }

    pub fn loop_state(&self) -> LoopState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Trail history as last handed to the backend, newest first.
    pub fn history(&self) -> &[Point] {
        &self.history
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }
}

impl<H: OverlayHost, B: FrameBackend> Drop for PointerTrailRenderer<H, B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
