//! Ghostcursor Bridge library target.
//!
//! The wgpu overlay pipeline and the winit shell around it. The binary
//! entry point is in `main.rs`; the modules are public so `tests/*.rs` can
//! reach the pure parts (shader generation, uniform layouts, settings).

pub mod gfx;
pub mod settings;
pub mod shell;
pub mod util;
