use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Color, Vec2, Viewport};
use crate::error::GfxResult;

use super::{FramebufferId, GeometryId, ShaderId, TextureId};

/// Names of the uniforms every built-in shader understands.
///
/// Backends map these onto their uniform block; unknown names are ignored.
pub mod uniform {
    pub const PROJECTION: &str = "projection";
    pub const VIEW: &str = "view";
    pub const MODEL: &str = "model";
    pub const COLOR: &str = "color";
    pub const LINE_COLOR: &str = "line_color";
    pub const UV_OFFSET: &str = "uv_offset";
    pub const UV_SIZE: &str = "uv_size";
    pub const TIME: &str = "time";
    pub const STRENGTH: &str = "strength";
    pub const RADIUS: &str = "radius";
    pub const EDGE: &str = "edge";
    pub const TEX_SIZE: &str = "tex_size";
}

/// Shader program source.
///
/// `vertex` must define `vs_main` and `fragment` must define `fs_main`. Both are
/// compiled against the shared prelude (uniform block, texture/sampler bindings,
/// vertex in/out structs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        vertex: impl Into<Cow<'static, str>>,
        fragment: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Value written to a named shader uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2(Vec2),
    Color(Color),
    Mat4(glam::Mat4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Color> for UniformValue {
    fn from(v: Color) -> Self {
        UniformValue::Color(v)
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(v: glam::Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// Interleaved vertex: position + texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { pos: [x, y, 0.0], uv: [u, v] }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Destination of a render pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PassTarget {
    /// Offscreen framebuffer; the pass covers the whole attachment.
    Framebuffer(FramebufferId),
    /// The window surface, restricted to `viewport` (physical pixels).
    Screen { viewport: Viewport },
}

/// One draw of a geometry with a shader and an optional texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub shader: ShaderId,
    pub geometry: GeometryId,
    /// `None` samples an opaque white texel.
    pub texture: Option<TextureId>,
}

/// Graphics operations the render pipeline is built on.
///
/// All calls happen on the thread that owns the context. Uniform values set
/// with [`GraphicsContext::set_uniform`] persist on the shader until
/// overwritten and are captured at each [`GraphicsContext::draw`].
///
/// Draws are only valid between `begin_pass` and `end_pass`.
pub trait GraphicsContext {
    /// Seconds since the context was created.
    fn elapsed(&self) -> f32;

    fn compile_shader(&mut self, source: &ShaderSource) -> GfxResult<ShaderId>;
    fn destroy_shader(&mut self, shader: ShaderId);

    fn create_geometry(&mut self, label: &str, vertices: &[Vertex]) -> GfxResult<GeometryId>;
    fn destroy_geometry(&mut self, geometry: GeometryId);

    /// Creates a texture from tightly packed RGBA8 pixels.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> GfxResult<TextureId>;
    /// Replaces the pixels of `texture`, reallocating it when the size changes.
    fn update_texture(&mut self, texture: TextureId, width: u32, height: u32, rgba: &[u8]) -> GfxResult<()>;
    fn destroy_texture(&mut self, texture: TextureId);

    fn create_framebuffer(&mut self, width: u32, height: u32) -> GfxResult<FramebufferId>;
    /// Destroys the framebuffer together with its color texture.
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId);
    fn framebuffer_texture(&self, framebuffer: FramebufferId) -> Option<TextureId>;
    fn framebuffer_size(&self, framebuffer: FramebufferId) -> Option<(u32, u32)>;

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue);

    /// Opens a pass on `target`, clearing it first when `clear` is set.
    fn begin_pass(&mut self, target: PassTarget, clear: Option<Color>);
    fn draw(&mut self, call: DrawCall);
    fn end_pass(&mut self);
}
