//! Bloom: bright-pass, a five-level chain of separable Gaussian blurs, and
//! a composite that adds the blurred levels back onto the scene.

use ghostcursor_core::config::BloomSettings;
use wgpu::{BindGroup, Buffer, CommandEncoder, Device, Queue, Sampler};

use super::fullscreen::{FullscreenPipeline, uniform_buffer};
use super::target::{INTERMEDIATE_FORMAT, RenderTarget};

pub const MIP_LEVELS: usize = 5;
pub const BLUR_KERNEL_RADII: [u32; MIP_LEVELS] = [3, 5, 7, 9, 11];
pub const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];
/// Width of the soft knee above the luminosity threshold.
pub const SMOOTH_WIDTH: f32 = 0.01;

pub const BRIGHT_WGSL: &str = include_str!("shaders/bloom_bright.wgsl");
pub const BLUR_WGSL: &str = include_str!("shaders/bloom_blur.wgsl");
pub const COMPOSITE_WGSL: &str = include_str!("shaders/bloom_composite.wgsl");

/// Per-level weights: each base factor is pulled toward `1.2 - f` by
/// `radius`, then scaled by `strength`.
pub fn bloom_factors(strength: f32, radius: f32) -> [f32; MIP_LEVELS] {
    BLOOM_FACTORS.map(|f| strength * (f + (1.2 - 2.0 * f) * radius))
}

/// Target size of each blur level. Level 0 is half the scene; each further
/// level halves again (rounded, at least 1).
pub fn mip_sizes(width: u32, height: u32) -> [(u32, u32); MIP_LEVELS] {
    let half = |v: u32| ((v as f32 / 2.0).round() as u32).max(1);
    let mut sizes = [(1, 1); MIP_LEVELS];
    let (mut w, mut h) = (half(width), half(height));
    for size in sizes.iter_mut() {
        *size = (w, h);
        w = half(w);
        h = half(h);
    }
    sizes
}

// ════════════════════════════════════════════════════════════════════
// Uniforms
// ════════════════════════════════════════════════════════════════════

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BrightUniforms {
    /// threshold, smooth width
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniforms {
    /// texel size xy, direction zw
    pub texel_dir: [f32; 4],
    /// radius, sigma
    pub kernel: [f32; 4],
}

impl BlurUniforms {
    pub fn new(texel: [f32; 2], direction: [f32; 2], radius: u32) -> Self {
        let r = radius as f32;
        Self {
            texel_dir: [texel[0], texel[1], direction[0], direction[1]],
            kernel: [r, r, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BloomCompositeUniforms {
    pub factors: [f32; 4],
    /// x = factor of the last level
    pub extra: [f32; 4],
}

impl BloomCompositeUniforms {
    pub fn new(settings: &BloomSettings) -> Self {
        let f = bloom_factors(settings.strength, settings.radius);
        Self {
            factors: [f[0], f[1], f[2], f[3]],
            extra: [f[4], 0.0, 0.0, 0.0],
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Pass
// ════════════════════════════════════════════════════════════════════

struct BloomPipelines {
    bright: FullscreenPipeline,
    blur: FullscreenPipeline,
    composite: FullscreenPipeline,
}

/// One buffer per draw. A single shared blur buffer would be overwritten
/// before the encoder runs, leaving every level with the last values.
struct BloomBuffers {
    bright: Buffer,
    blur: Vec<[Buffer; 2]>,
    composite: Buffer,
}

impl BloomBuffers {
    fn destroy(&self) {
        self.bright.destroy();
        for [h, v] in &self.blur {
            h.destroy();
            v.destroy();
        }
        self.composite.destroy();
    }
}

struct BlurLevel {
    horizontal: RenderTarget,
    vertical: RenderTarget,
    horizontal_bind: BindGroup,
    vertical_bind: BindGroup,
}

/// Everything sized by the scene; rebuilt on resize.
struct BloomTargets {
    bright: RenderTarget,
    bright_bind: BindGroup,
    levels: Vec<BlurLevel>,
    output: RenderTarget,
    composite_bind: BindGroup,
}

impl BloomTargets {
    fn new(
        device: &Device,
        queue: &Queue,
        sampler: &Sampler,
        pipelines: &BloomPipelines,
        buffers: &BloomBuffers,
        scene: &RenderTarget,
    ) -> Self {
        let (width, height) = scene.size();
        let sizes = mip_sizes(width, height);

        let bright = RenderTarget::new(device, "bloom-bright", sizes[0].0, sizes[0].1);
        let bright_bind = pipelines
            .bright
            .bind_group(device, &buffers.bright, sampler, &[scene.view()]);

        let mut levels: Vec<BlurLevel> = Vec::with_capacity(MIP_LEVELS);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            let source = match levels.last() {
                Some(prev) => &prev.vertical,
                None => &bright,
            };
            let horizontal = RenderTarget::new(device, "bloom-blur-h", w, h);
            let vertical = RenderTarget::new(device, "bloom-blur-v", w, h);
            let texel = horizontal.texel_size();
            let radius = BLUR_KERNEL_RADII[i];

            let [h_buf, v_buf] = &buffers.blur[i];
            queue.write_buffer(h_buf, 0, bytemuck::bytes_of(&BlurUniforms::new(texel, [1.0, 0.0], radius)));
            queue.write_buffer(v_buf, 0, bytemuck::bytes_of(&BlurUniforms::new(texel, [0.0, 1.0], radius)));

            let horizontal_bind = pipelines.blur.bind_group(device, h_buf, sampler, &[source.view()]);
            let vertical_bind = pipelines
                .blur
                .bind_group(device, v_buf, sampler, &[horizontal.view()]);

            levels.push(BlurLevel {
                horizontal,
                vertical,
                horizontal_bind,
                vertical_bind,
            });
        }

        let output = RenderTarget::new(device, "bloom-output", width, height);
        let mut inputs = vec![scene.view()];
        inputs.extend(levels.iter().map(|l| l.vertical.view()));
        let composite_bind = pipelines
            .composite
            .bind_group(device, &buffers.composite, sampler, &inputs);

        Self {
            bright,
            bright_bind,
            levels,
            output,
            composite_bind,
        }
    }

    fn destroy(&self) {
        self.bright.destroy();
        for level in &self.levels {
            level.horizontal.destroy();
            level.vertical.destroy();
        }
        self.output.destroy();
    }
}

pub struct BloomPass {
    pipelines: BloomPipelines,
    buffers: BloomBuffers,
    targets: BloomTargets,
}

impl BloomPass {
    pub fn new(
        device: &Device,
        queue: &Queue,
        sampler: &Sampler,
        settings: &BloomSettings,
        scene: &RenderTarget,
    ) -> Self {
        let pipelines = BloomPipelines {
            bright: FullscreenPipeline::new(device, "bloom-bright", BRIGHT_WGSL, 1, INTERMEDIATE_FORMAT),
            blur: FullscreenPipeline::new(device, "bloom-blur", BLUR_WGSL, 1, INTERMEDIATE_FORMAT),
            composite: FullscreenPipeline::new(
                device,
                "bloom-composite",
                COMPOSITE_WGSL,
                1 + MIP_LEVELS as u32,
                INTERMEDIATE_FORMAT,
            ),
        };

        let buffers = BloomBuffers {
            bright: uniform_buffer(device, "bloom-bright-uniforms", size_of::<BrightUniforms>() as u64),
            blur: (0..MIP_LEVELS)
                .map(|_| {
                    [
                        uniform_buffer(device, "bloom-blur-h-uniforms", size_of::<BlurUniforms>() as u64),
                        uniform_buffer(device, "bloom-blur-v-uniforms", size_of::<BlurUniforms>() as u64),
                    ]
                })
                .collect(),
            composite: uniform_buffer(
                device,
                "bloom-composite-uniforms",
                size_of::<BloomCompositeUniforms>() as u64,
            ),
        };

        let bright = BrightUniforms {
            params: [settings.threshold, SMOOTH_WIDTH, 0.0, 0.0],
        };
        queue.write_buffer(&buffers.bright, 0, bytemuck::bytes_of(&bright));
        queue.write_buffer(
            &buffers.composite,
            0,
            bytemuck::bytes_of(&BloomCompositeUniforms::new(settings)),
        );

        let targets = BloomTargets::new(device, queue, sampler, &pipelines, &buffers, scene);

        Self {
            pipelines,
            buffers,
            targets,
        }
    }

    pub fn output(&self) -> &RenderTarget {
        &self.targets.output
    }

    /// Rebuild every target against the resized `scene`.
    pub fn resize(&mut self, device: &Device, queue: &Queue, sampler: &Sampler, scene: &RenderTarget) {
        self.targets.destroy();
        self.targets = BloomTargets::new(device, queue, sampler, &self.pipelines, &self.buffers, scene);
    }

    pub fn draw(&self, encoder: &mut CommandEncoder) {
        let t = &self.targets;
        self.pipelines.bright.draw(encoder, t.bright.view(), &t.bright_bind);
        for level in &t.levels {
            self.pipelines
                .blur
                .draw(encoder, level.horizontal.view(), &level.horizontal_bind);
            self.pipelines
                .blur
                .draw(encoder, level.vertical.view(), &level.vertical_bind);
        }
        self.pipelines.composite.draw(encoder, t.output.view(), &t.composite_bind);
    }

    pub fn release(&self) {
        self.targets.destroy();
        self.buffers.destroy();
    }
}
