//! wgpu device ownership and the [`crate::render::GraphicsContext`] backend.
//!
//! [`Gpu`] holds the device and the window swapchain; [`WgpuBackend`] turns
//! recorded passes into wgpu render passes once per frame.

mod backend;
mod config;
mod gpu;
mod surface;

pub use backend::WgpuBackend;
pub use config::GpuConfig;
pub use gpu::{Frame, Gpu};
pub use surface::SurfaceRecovery;
