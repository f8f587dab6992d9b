//! Application Shell — winit lifecycle, event dispatch, the window host.
//!
//! The shell owns the winit event loop and the overlay renderer. It
//! translates platform events into pointer input, drives frames from
//! redraw requests, and reloads settings posted by the file watcher.

pub(crate) mod app;
pub mod events;
pub mod host;

pub use app::{AppEvent, GhostcursorApp, TrailRenderer, run};
