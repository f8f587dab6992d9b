//! The smoke pass: pattern shader, its uniform block, and trail upload.

use ghostcursor_core::{FrameUniforms, LiveParams, Point, Viewport};
use wgpu::{BindGroup, Buffer, CommandEncoder, Device, Queue, Sampler};

use super::fullscreen::{FullscreenPipeline, uniform_buffer};
use super::target::{INTERMEDIATE_FORMAT, RenderTarget};

const SMOKE_WGSL: &str = include_str!("shaders/smoke.wgsl");
const TRAIL_PLACEHOLDER: &str = "__MAX_TRAIL_LENGTH__";

/// Smoke fragment shader with the trail array sized for `trail_length`.
pub fn smoke_shader_source(trail_length: usize) -> String {
    SMOKE_WGSL.replace(TRAIL_PLACEHOLDER, &trail_length.max(1).to_string())
}

// ════════════════════════════════════════════════════════════════════
// Uniforms
// ════════════════════════════════════════════════════════════════════

/// Fixed part of the smoke uniform block. The trail array follows it, one
/// `vec4` per entry (uniform arrays have a 16-byte stride).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SmokeHeader {
    /// width, height, 1, aspect
    pub resolution: [f32; 4],
    pub mouse: [f32; 4],
    /// Linear base color.
    pub base_color: [f32; 4],
    /// time, opacity, pattern scale, brightness
    pub params: [f32; 4],
    /// x = edge intensity
    pub extra: [f32; 4],
}

impl SmokeHeader {
    pub fn new(viewport: &Viewport, frame: &FrameUniforms<'_>, live: &LiveParams) -> Self {
        let [r, g, b] = live.color.to_linear();
        Self {
            resolution: [
                viewport.width as f32,
                viewport.height as f32,
                1.0,
                viewport.aspect(),
            ],
            mouse: [frame.mouse[0], frame.mouse[1], 0.0, 0.0],
            base_color: [r, g, b, 1.0],
            params: [
                frame.time,
                frame.opacity,
                viewport.pattern_scale,
                live.brightness,
            ],
            extra: [live.edge_intensity, 0.0, 0.0, 0.0],
        }
    }
}

/// Total uniform size for a trail of `trail_length` entries.
pub fn smoke_uniform_size(trail_length: usize) -> u64 {
    (std::mem::size_of::<SmokeHeader>() + trail_length.max(1) * 16) as u64
}

/// Pack the trail as `vec4`s. Always exactly `trail_length` entries: short
/// input is padded with its last point (or the center), long input is cut.
pub fn pack_trail(trail: &[Point], trail_length: usize, out: &mut Vec<[f32; 4]>) {
    let fill = trail.last().copied().unwrap_or(ghostcursor_core::trail::CENTER);
    out.clear();
    out.extend(
        trail
            .iter()
            .chain(std::iter::repeat(&fill))
            .take(trail_length.max(1))
            .map(|p| [p[0], p[1], 0.0, 0.0]),
    );
}

// ════════════════════════════════════════════════════════════════════
// Pass
// ════════════════════════════════════════════════════════════════════

pub struct SmokePass {
    pipeline: FullscreenPipeline,
    uniforms: Buffer,
    bind_group: BindGroup,
    target: RenderTarget,
    trail_length: usize,
    packed: Vec<[f32; 4]>,
}

impl SmokePass {
    pub fn new(device: &Device, sampler: &Sampler, trail_length: usize, width: u32, height: u32) -> Self {
        let trail_length = trail_length.max(1);
        let pipeline = FullscreenPipeline::new(
            device,
            "smoke",
            &smoke_shader_source(trail_length),
            0,
            INTERMEDIATE_FORMAT,
        );
        let uniforms = uniform_buffer(device, "smoke-uniforms", smoke_uniform_size(trail_length));
        let bind_group = pipeline.bind_group(device, &uniforms, sampler, &[]);
        let target = RenderTarget::new(device, "smoke-target", width, height);

        Self {
            pipeline,
            uniforms,
            bind_group,
            target,
            trail_length,
            packed: Vec::with_capacity(trail_length),
        }
    }

    pub fn output(&self) -> &RenderTarget {
        &self.target
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        self.target.destroy();
        self.target = RenderTarget::new(device, "smoke-target", width, height);
    }

    pub fn update(&mut self, queue: &Queue, viewport: &Viewport, frame: &FrameUniforms<'_>, live: &LiveParams) {
        let header = SmokeHeader::new(viewport, frame, live);
        pack_trail(frame.trail, self.trail_length, &mut self.packed);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&header));
        queue.write_buffer(
            &self.uniforms,
            std::mem::size_of::<SmokeHeader>() as u64,
            bytemuck::cast_slice(&self.packed),
        );
    }

    pub fn draw(&self, encoder: &mut CommandEncoder) {
        self.pipeline.draw(encoder, self.target.view(), &self.bind_group);
    }

    pub fn release(&self) {
        self.target.destroy();
        self.uniforms.destroy();
    }
}
