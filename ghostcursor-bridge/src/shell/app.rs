// ghostcursor-bridge/src/shell/app.rs
//! Application state and the winit event loop.
//!
//! The app owns one window and at most one mounted overlay renderer. The
//! settings watcher runs on its own thread and only ever posts
//! `AppEvent::SettingsChanged` into the loop; all renderer state stays on
//! the event-loop thread.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use ghostcursor_core::settings::load_settings_or_default;
use ghostcursor_core::{OverlayHost, PointerTrailRenderer, RendererStatus, SettingsWatcher};

use super::events;
use super::host::WindowHost;
use crate::gfx::{FramePipeline, SurfaceOptions};
use crate::settings::AppSettings;

pub type TrailRenderer = PointerTrailRenderer<WindowHost, FramePipeline>;

/// Posted into the event loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    SettingsChanged,
}

// ════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════

pub struct GhostcursorApp {
    pub settings_path: PathBuf,
    pub settings: AppSettings,

    // ── Window + overlay ──
    pub window: Option<Arc<Window>>,
    pub renderer: Option<TrailRenderer>,

    /// Set by the first touch event; picks touch defaults on the next
    /// mount unless the settings force a device type.
    pub touch_seen: bool,

    // Dropping it stops the watcher thread.
    _watcher: Option<SettingsWatcher>,
}

impl GhostcursorApp {
    pub fn new(settings_path: PathBuf, settings: AppSettings, watcher: Option<SettingsWatcher>) -> Self {
        Self {
            settings_path,
            settings,
            window: None,
            renderer: None,
            touch_seen: false,
            _watcher: watcher,
        }
    }

    pub fn is_touch(&self) -> bool {
        self.settings.touch.unwrap_or(self.touch_seen)
    }

    /// (Re)build the overlay on the current window. A failed GPU setup
    /// leaves a degraded renderer that draws nothing.
    pub fn mount(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        // Release the old surface before creating a new one on the same window.
        if let Some(mut old) = self.renderer.take() {
            old.teardown();
        }

        let host = WindowHost::new(window.clone(), self.is_touch());
        let surface = SurfaceOptions {
            backdrop: self.settings.backdrop(),
            low_power: host.is_touch(),
        };
        let renderer = PointerTrailRenderer::mount_with_options(host, &self.settings.render, |viewport, config| {
            FramePipeline::new(window, viewport, config, surface)
        });
        self.renderer = Some(renderer);
    }

    /// Re-read the settings file. Live-only changes are pushed into the
    /// running overlay; anything else remounts it.
    pub fn reload_settings(&mut self) {
        let next: AppSettings = load_settings_or_default(&self.settings_path);
        if next == self.settings {
            return;
        }
        let previous = std::mem::replace(&mut self.settings, next);

        if let Some(window) = &self.window {
            if previous.title() != self.settings.title() {
                window.set_title(self.settings.title());
            }
        }

        let config = self.settings.render.resolve(self.is_touch());
        let remount = match &self.renderer {
            None => return,
            Some(r) => {
                previous.surface_differs(&self.settings)
                    || r.config().requires_rebuild(&config)
                    || r.status() != RendererStatus::Active
            }
        };

        if remount {
            tracing::info!("settings changed, remounting overlay");
            self.mount();
        } else if let Some(renderer) = self.renderer.as_mut() {
            tracing::info!("settings changed, applying live");
            renderer.apply_live(config.live_params());
            renderer.repaint();
        }
    }

    /// The window's size or scale factor changed.
    pub fn resize_overlay(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let (w, h) = renderer.host().logical_size();
        renderer.on_resize(w, h);
        // An idle overlay still needs one frame at the new size.
        renderer.host().window().request_redraw();
    }

    pub fn note_touch(&mut self) {
        if !self.touch_seen {
            tracing::info!("touch input detected");
            self.touch_seen = true;
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.teardown();
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// winit ApplicationHandler
// ════════════════════════════════════════════════════════════════════

impl ApplicationHandler<AppEvent> for GhostcursorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.settings.window_size();
        let attrs = Window::default_attributes()
            .with_title(self.settings.title())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                self.mount();
                tracing::info!("Window + overlay initialized");
            }
            Err(e) => {
                tracing::error!("Window creation failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        events::handle_window_event(self, event_loop, event);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::SettingsChanged => self.reload_settings(),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
        tracing::info!("Ghostcursor exiting");
    }
}

// ════════════════════════════════════════════════════════════════════
// Entry point
// ════════════════════════════════════════════════════════════════════

pub fn run(settings_path: PathBuf) -> anyhow::Result<()> {
    // Tracing is initialized once in the binary entry point (src/main.rs).

    tracing::info!("Ghostcursor v{} starting...", env!("CARGO_PKG_VERSION"));

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .context("creating event loop")?;
    // Frames are driven by request_redraw; sleep otherwise.
    event_loop.set_control_flow(ControlFlow::Wait);

    let settings: AppSettings = load_settings_or_default(&settings_path);

    let proxy = event_loop.create_proxy();
    let watcher = match SettingsWatcher::new(&settings_path, move || {
        let _ = proxy.send_event(AppEvent::SettingsChanged);
    }) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("settings hot reload disabled: {e}");
            None
        }
    };

    let mut app = GhostcursorApp::new(settings_path, settings, watcher);
    event_loop.run_app(&mut app).context("running event loop")?;
    Ok(())
}
