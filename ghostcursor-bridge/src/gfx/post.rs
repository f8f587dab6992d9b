//! Film grain and unpremultiply, the two single-input passes after bloom.

use wgpu::{BindGroup, Buffer, CommandEncoder, Device, Queue, Sampler};

use super::fullscreen::{FullscreenPipeline, uniform_buffer};
use super::target::{INTERMEDIATE_FORMAT, RenderTarget};

pub const GRAIN_WGSL: &str = include_str!("shaders/grain.wgsl");
pub const UNPREMULTIPLY_WGSL: &str = include_str!("shaders/unpremultiply.wgsl");

/// Alpha floor for the unpremultiply divide.
pub const MIN_ALPHA: f32 = 1e-5;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrainUniforms {
    /// intensity, time
    pub params: [f32; 4],
}

impl GrainUniforms {
    pub fn new(intensity: f32, time: f32) -> Self {
        Self {
            params: [intensity, time, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UnpremultiplyUniforms {
    /// x = alpha floor
    pub params: [f32; 4],
}

/// A pass reading one target and writing another of the same size.
struct SinglePass {
    label: &'static str,
    pipeline: FullscreenPipeline,
    uniforms: Buffer,
    bind_group: BindGroup,
    target: RenderTarget,
}

impl SinglePass {
    fn new(
        device: &Device,
        sampler: &Sampler,
        label: &'static str,
        fragment: &str,
        uniform_size: u64,
        input: &RenderTarget,
    ) -> Self {
        let pipeline = FullscreenPipeline::new(device, label, fragment, 1, INTERMEDIATE_FORMAT);
        let uniforms = uniform_buffer(device, label, uniform_size);
        let bind_group = pipeline.bind_group(device, &uniforms, sampler, &[input.view()]);
        let (w, h) = input.size();
        let target = RenderTarget::new(device, label, w, h);
        Self {
            label,
            pipeline,
            uniforms,
            bind_group,
            target,
        }
    }

    fn resize(&mut self, device: &Device, sampler: &Sampler, input: &RenderTarget) {
        self.target.destroy();
        let (w, h) = input.size();
        self.target = RenderTarget::new(device, self.label, w, h);
        self.bind_group = self
            .pipeline
            .bind_group(device, &self.uniforms, sampler, &[input.view()]);
    }

    fn draw(&self, encoder: &mut CommandEncoder) {
        self.pipeline.draw(encoder, self.target.view(), &self.bind_group);
    }

    fn release(&self) {
        self.target.destroy();
        self.uniforms.destroy();
    }
}

// ════════════════════════════════════════════════════════════════════
// Grain
// ════════════════════════════════════════════════════════════════════

pub struct GrainPass(SinglePass);

impl GrainPass {
    pub fn new(device: &Device, sampler: &Sampler, input: &RenderTarget) -> Self {
        Self(SinglePass::new(
            device,
            sampler,
            "grain",
            GRAIN_WGSL,
            size_of::<GrainUniforms>() as u64,
            input,
        ))
    }

    pub fn output(&self) -> &RenderTarget {
        &self.0.target
    }

    pub fn resize(&mut self, device: &Device, sampler: &Sampler, input: &RenderTarget) {
        self.0.resize(device, sampler, input);
    }

    pub fn update(&self, queue: &Queue, intensity: f32, time: f32) {
        queue.write_buffer(
            &self.0.uniforms,
            0,
            bytemuck::bytes_of(&GrainUniforms::new(intensity, time)),
        );
    }

    pub fn draw(&self, encoder: &mut CommandEncoder) {
        self.0.draw(encoder);
    }

    pub fn release(&self) {
        self.0.release();
    }
}

// ════════════════════════════════════════════════════════════════════
// Unpremultiply
// ════════════════════════════════════════════════════════════════════

pub struct UnpremultiplyPass(SinglePass);

impl UnpremultiplyPass {
    pub fn new(device: &Device, queue: &Queue, sampler: &Sampler, input: &RenderTarget) -> Self {
        let pass = SinglePass::new(
            device,
            sampler,
            "unpremultiply",
            UNPREMULTIPLY_WGSL,
            size_of::<UnpremultiplyUniforms>() as u64,
            input,
        );
        let uniforms = UnpremultiplyUniforms {
            params: [MIN_ALPHA, 0.0, 0.0, 0.0],
        };
        queue.write_buffer(&pass.uniforms, 0, bytemuck::bytes_of(&uniforms));
        Self(pass)
    }

    pub fn output(&self) -> &RenderTarget {
        &self.0.target
    }

    pub fn resize(&mut self, device: &Device, sampler: &Sampler, input: &RenderTarget) {
        self.0.resize(device, sampler, input);
    }

    pub fn draw(&self, encoder: &mut CommandEncoder) {
        self.0.draw(encoder);
    }

    pub fn release(&self) {
        self.0.release();
    }
}
