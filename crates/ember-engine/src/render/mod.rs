//! Rendering seam.
//!
//! The pipeline talks to the GPU exclusively through [`GraphicsContext`], using
//! opaque non-zero handles. Two implementations exist:
//! - `device::WgpuBackend` renders with wgpu
//! - [`HeadlessContext`] records commands without a GPU
//!
//! Convention:
//! - world geometry is in design pixels (top-left origin, +Y down)
//! - the projection maps the window's initial size onto the target

pub mod builtin;
mod context;
mod handle;
mod headless;

pub use context::{
    uniform, DrawCall, GraphicsContext, PassTarget, ShaderSource, UniformValue, Vertex,
};
pub(crate) use handle::HandleAllocator;
pub use handle::{FramebufferId, GeometryId, ShaderId, TextureId};
pub use headless::{Command, HeadlessContext, RecordedDraw};
