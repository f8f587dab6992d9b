//! The full overlay pipeline behind [`FrameBackend`]:
//! smoke → bloom → grain → unpremultiply → composite onto the surface.

use std::sync::Arc;

use ghostcursor_core::{
    BackendError, FrameBackend, FrameOutcome, FrameUniforms, LiveParams, RenderConfig, Rgb, Viewport,
};
use wgpu::Sampler;
use winit::window::Window;

use super::bloom::BloomPass;
use super::composite::CompositePass;
use super::fullscreen::linear_sampler;
use super::gpu::GpuContext;
use super::post::{GrainPass, UnpremultiplyPass};
use super::smoke::SmokePass;

/// Host-side settings the overlay config does not cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Color the overlay is blended onto.
    pub backdrop: Rgb,
    /// Prefer the integrated GPU.
    pub low_power: bool,
}

pub struct FramePipeline {
    gpu: GpuContext,
    sampler: Sampler,
    smoke: SmokePass,
    bloom: BloomPass,
    grain: GrainPass,
    unpremultiply: UnpremultiplyPass,
    composite: CompositePass,
    viewport: Viewport,
    live: LiveParams,
    released: bool,
}

impl FramePipeline {
    pub fn new(
        window: Arc<Window>,
        viewport: &Viewport,
        config: &RenderConfig,
        surface: SurfaceOptions,
    ) -> anyhow::Result<Self> {
        let gpu = GpuContext::new(window, surface.low_power)?;
        let device = &gpu.device;
        let queue = &gpu.queue;
        let sampler = linear_sampler(device);

        let smoke = SmokePass::new(device, &sampler, config.trail_length, viewport.width, viewport.height);
        let bloom = BloomPass::new(device, queue, &sampler, &config.bloom, smoke.output());
        let grain = GrainPass::new(device, &sampler, bloom.output());
        let unpremultiply = UnpremultiplyPass::new(device, queue, &sampler, grain.output());
        let composite = CompositePass::new(
            device,
            queue,
            &sampler,
            gpu.format,
            unpremultiply.output(),
            surface.backdrop,
            config.blend_mode,
        );

        tracing::debug!(format = ?gpu.format, trail = config.trail_length, "overlay pipeline built");

        Ok(Self {
            gpu,
            sampler,
            smoke,
            bloom,
            grain,
            unpremultiply,
            composite,
            viewport: *viewport,
            live: config.live_params(),
            released: false,
        })
    }
}

impl FrameBackend for FramePipeline {
    fn resize(&mut self, viewport: &Viewport) {
        if self.released {
            return;
        }
        self.viewport = *viewport;
        self.gpu.reconfigure();

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        self.smoke.resize(device, viewport.width, viewport.height);
        self.bloom.resize(device, queue, &self.sampler, self.smoke.output());
        self.grain.resize(device, &self.sampler, self.bloom.output());
        self.unpremultiply.resize(device, &self.sampler, self.grain.output());
        self.composite.rebind(device, &self.sampler, self.unpremultiply.output());
    }

    fn render(&mut self, frame: &FrameUniforms<'_>) -> Result<FrameOutcome, BackendError> {
        if self.released {
            return Err(BackendError::ContextLost("pipeline released".into()));
        }
        let Some(output) = self.gpu.acquire()? else {
            return Ok(FrameOutcome::Skipped);
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let queue = &self.gpu.queue;
        self.smoke.update(queue, &self.viewport, frame, &self.live);
        self.grain.update(queue, self.live.grain_intensity, frame.time);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay-encoder"),
            });
        self.smoke.draw(&mut encoder);
        self.bloom.draw(&mut encoder);
        self.grain.draw(&mut encoder);
        self.unpremultiply.draw(&mut encoder);
        self.composite.draw(&mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(FrameOutcome::Presented)
    }

    fn apply_live(&mut self, live: &LiveParams) {
        if self.released {
            return;
        }
        if live.blend_mode != self.live.blend_mode {
            self.composite.set_mode(&self.gpu.queue, live.blend_mode);
        }
        self.live = *live;
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.smoke.release();
        self.bloom.release();
        self.grain.release();
        self.unpremultiply.release();
        self.composite.release();
        tracing::debug!("overlay pipeline released");
    }
}
