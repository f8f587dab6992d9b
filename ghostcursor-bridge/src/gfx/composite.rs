//! Final pass: blend the overlay onto the window backdrop with the
//! configured blend mode and write the swapchain texture.

use ghostcursor_core::{BlendMode, Rgb};
use wgpu::{BindGroup, Buffer, CommandEncoder, Device, Queue, Sampler, TextureFormat, TextureView};

use super::fullscreen::{FullscreenPipeline, uniform_buffer};
use super::target::RenderTarget;

pub const COMPOSITE_WGSL: &str = include_str!("shaders/composite.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniforms {
    /// Gamma-encoded backdrop. Blending happens in the same space the
    /// overlay was written in.
    pub backdrop: [f32; 4],
    /// x = blend mode code, y = 1 if the surface re-encodes to sRGB
    pub mode: [u32; 4],
}

impl CompositeUniforms {
    pub fn new(backdrop: Rgb, mode: BlendMode, srgb_surface: bool) -> Self {
        Self {
            backdrop: [backdrop.r, backdrop.g, backdrop.b, 1.0],
            mode: [mode.shader_code(), u32::from(srgb_surface), 0, 0],
        }
    }
}

pub struct CompositePass {
    pipeline: FullscreenPipeline,
    uniforms: Buffer,
    bind_group: BindGroup,
    backdrop: Rgb,
    srgb_surface: bool,
}

impl CompositePass {
    pub fn new(
        device: &Device,
        queue: &Queue,
        sampler: &Sampler,
        format: TextureFormat,
        overlay: &RenderTarget,
        backdrop: Rgb,
        mode: BlendMode,
    ) -> Self {
        let pipeline = FullscreenPipeline::new(device, "composite", COMPOSITE_WGSL, 1, format);
        let uniforms = uniform_buffer(device, "composite-uniforms", size_of::<CompositeUniforms>() as u64);
        let bind_group = pipeline.bind_group(device, &uniforms, sampler, &[overlay.view()]);
        let pass = Self {
            pipeline,
            uniforms,
            bind_group,
            backdrop,
            srgb_surface: format.is_srgb(),
        };
        pass.set_mode(queue, mode);
        pass
    }

    pub fn set_mode(&self, queue: &Queue, mode: BlendMode) {
        let uniforms = CompositeUniforms::new(self.backdrop, mode, self.srgb_surface);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn rebind(&mut self, device: &Device, sampler: &Sampler, overlay: &RenderTarget) {
        self.bind_group = self
            .pipeline
            .bind_group(device, &self.uniforms, sampler, &[overlay.view()]);
    }

    pub fn draw(&self, encoder: &mut CommandEncoder, surface: &TextureView) {
        self.pipeline.draw(encoder, surface, &self.bind_group);
    }

    pub fn release(&self) {
        self.uniforms.destroy();
    }
}
