//! # Ghostcursor Core
//!
//! GPU-agnostic half of the pointer-trail overlay: configuration, the trail
//! ring buffer, pointer inertia and fade, the pixel budget, the frame
//! scheduler, and the renderer state machine that ties them to a host and a
//! drawing backend.

pub mod backend;
pub mod blend;
pub mod color;
pub mod config;
pub mod error;
pub mod host;
pub mod pointer;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod trail;
pub mod viewport;
pub mod watcher;

pub use backend::{FrameBackend, FrameOutcome, FrameUniforms};
pub use blend::BlendMode;
pub use color::Rgb;
pub use config::{LiveParams, RenderConfig, RenderOptions};
pub use error::{BackendError, ConfigError};
pub use host::{OverlayHost, OverlayLayer};
pub use renderer::{PointerTrailRenderer, RendererStatus};
pub use scheduler::{FrameScheduler, LoopState};
pub use trail::{Point, TrailBuffer};
pub use viewport::Viewport;
pub use watcher::SettingsWatcher;
