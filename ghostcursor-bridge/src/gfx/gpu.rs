//! wgpu device and surface lifecycle.
//!
//! GpuContext owns the instance-level objects for one window: surface,
//! device, queue and the surface configuration. The surface always matches
//! the window's physical size; the overlay's own resolution is independent
//! and handled by the passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use ghostcursor_core::BackendError;
use wgpu::{
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceTexture, TextureFormat,
    TextureUsages,
};
use winit::window::Window;

pub struct GpuContext {
    window: Arc<Window>,
    surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    config: SurfaceConfiguration,
    pub format: TextureFormat,
    lost: Arc<AtomicBool>,
}

impl GpuContext {
    /// Initialize wgpu for `window`. Blocks until the adapter is ready.
    /// `low_power` picks the integrated GPU where there is a choice.
    pub fn new(window: Arc<Window>, low_power: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let power_preference = if low_power {
            PowerPreference::LowPower
        } else {
            PowerPreference::HighPerformance
        };
        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter found")?;

        tracing::info!(
            "GPU adapter: {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("ghostcursor-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .context("requesting GPU device")?;

        let lost = Arc::new(AtomicBool::new(false));
        let flag = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                tracing::debug!("GPU device destroyed");
            } else {
                tracing::error!(?reason, "GPU device lost: {message}");
            }
            flag.store(true, Ordering::Release);
        });

        // The shaders gamma-encode themselves, so prefer a linear format.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            format,
            lost,
        })
    }

    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Match the surface to the window's current physical size.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Next swapchain texture. `Ok(None)` means skip this frame.
    pub fn acquire(&mut self) -> Result<Option<SurfaceTexture>, BackendError> {
        if self.is_lost() {
            return Err(BackendError::ContextLost("GPU device lost".into()));
        }
        // Not every platform reports a resized window as outdated.
        let size = self.window.inner_size();
        if (size.width, size.height) != self.surface_size() {
            self.reconfigure();
        }
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(BackendError::OutOfMemory),
            Err(e) => {
                tracing::warn!("Surface error: {:?}", e);
                Ok(None)
            }
        }
    }
}
