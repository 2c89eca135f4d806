use super::GpuConfig;

/// How the runtime proceeds after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceRecovery {
    /// The swapchain was rebuilt; the next frame should succeed.
    Reconfigured,
    /// Drop this frame and try again next tick.
    Skip,
    /// The device cannot continue.
    Fatal,
}

/// Window surface together with its current configuration.
///
/// A zero-sized window (minimized) leaves the surface unconfigured until the
/// next non-zero resize.
pub(crate) struct SwapChain<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
}

impl<'w> SwapChain<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        gpu: &GpuConfig,
        (width, height): (u32, u32),
    ) -> Option<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, gpu.srgb)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: gpu.present_mode(),
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: gpu.max_frame_latency,
        };

        let mut chain = Self {
            surface,
            config,
            configured: false,
        };
        chain.resize(device, width, height);
        Some(chain)
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns false when the size is degenerate and the surface was left alone.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            self.configured = false;
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
        self.configured = true;
        true
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        if !self.configured {
            return Err(wgpu::SurfaceError::Outdated);
        }
        self.surface.get_current_texture()
    }

    pub(crate) fn recover(&mut self, device: &wgpu::Device, err: &wgpu::SurfaceError) -> SurfaceRecovery {
        let recovery = recovery_for(err);
        if recovery == SurfaceRecovery::Reconfigured && self.configured {
            self.surface.configure(device, &self.config);
        }
        recovery
    }
}

fn recovery_for(err: &wgpu::SurfaceError) -> SurfaceRecovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceRecovery::Skip,
    }
}

/// sRGB variants first when asked, otherwise whatever the surface lists first.
fn pick_format(formats: &[wgpu::TextureFormat], srgb: bool) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;
    if !srgb {
        return Some(formats.iter().copied().find(|f| !f.is_srgb()).unwrap_or(first));
    }
    Some(formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(first))
}

fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}
