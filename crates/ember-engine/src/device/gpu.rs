use anyhow::{Context, Result};
use winit::window::Window;

use super::surface::{SurfaceRecovery, SwapChain};
use super::{GpuConfig, WgpuBackend};

/// Acquired swapchain image plus the encoder recording into it.
///
/// Present it with [`Gpu::present`] before acquiring the next one.
pub struct Frame {
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    texture: wgpu::SurfaceTexture,
}

/// Device, queue and the window's swapchain.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    _adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    swapchain: SwapChain<'w>,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, config: GpuConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let info = adapter.get_info();
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let (device, queue) = request_device(&adapter, &config).await?;

        let swapchain = SwapChain::new(surface, &adapter, &device, &config, (size.width, size.height))
            .context("surface reports no texture formats")?;
        log::debug!("swapchain {:?} at {:?}", swapchain.format(), swapchain.size());

        Ok(Self {
            _instance: instance,
            _adapter: adapter,
            device,
            queue,
            swapchain,
        })
    }

    /// Backend sharing this device and queue, targeting the swapchain format.
    pub fn create_backend(&self) -> WgpuBackend {
        WgpuBackend::new(self.device.clone(), self.queue.clone(), self.swapchain.format())
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Configured swapchain size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.swapchain.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.swapchain.resize(&self.device, width, height) {
            log::debug!("swapchain resize to {width}x{height} deferred");
        }
    }

    pub fn begin_frame(&self) -> Result<Frame, wgpu::SurfaceError> {
        let texture = self.swapchain.acquire()?;
        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember frame"),
            });
        Ok(Frame { view, encoder, texture })
    }

    pub fn present(&self, frame: Frame) {
        let Frame { view, encoder, texture } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        texture.present();
    }

    pub fn recover(&mut self, err: &wgpu::SurfaceError) -> SurfaceRecovery {
        self.swapchain.recover(&self.device, err)
    }
}

async fn request_device(adapter: &wgpu::Adapter, config: &GpuConfig) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("ember device"),
            required_features: config.features,
            required_limits: config.limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to open the GPU device")
}
