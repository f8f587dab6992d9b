//! GPU Rendering Subsystem.
//!
//! Manages the wgpu device and surface and the overlay's pass chain.
//! Sub-modules:
//!   gpu        — device/surface lifecycle, device-loss detection
//!   target     — offscreen float render targets
//!   fullscreen — shared fullscreen-triangle pipeline
//!   smoke      — pointer/trail smoke shader and its uniforms
//!   bloom      — bright-pass, mip blur chain, composite
//!   post       — film grain, unpremultiply
//!   composite  — blend-mode composite onto the window surface
//!   pipeline   — all of the above behind `FrameBackend`

pub mod bloom;
pub mod composite;
pub mod fullscreen;
mod gpu;
mod pipeline;
pub mod post;
pub mod smoke;
mod target;

pub use gpu::GpuContext;
pub use pipeline::{FramePipeline, SurfaceOptions};
pub use target::{INTERMEDIATE_FORMAT, RenderTarget};
