/// Device and swapchain settings for [`super::Gpu`].
#[derive(Debug, Clone)]
pub struct GpuConfig {
    /// Wait for vertical blank. Off selects the lowest-latency mode the
    /// surface supports.
    pub vsync: bool,
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    /// Render into an sRGB swapchain when one is offered.
    pub srgb: bool,
    /// Frames the CPU may queue ahead of the GPU.
    pub max_frame_latency: u32,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            srgb: true,
            max_frame_latency: 2,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
        }
    }
}

impl GpuConfig {
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_selects_present_mode() {
        let config = GpuConfig::default();
        assert_eq!(config.present_mode(), wgpu::PresentMode::AutoVsync);
        assert_eq!(config.with_vsync(false).present_mode(), wgpu::PresentMode::AutoNoVsync);
    }
}
