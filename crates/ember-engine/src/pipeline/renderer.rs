use glam::Mat4;

use crate::coords::{Color, Vec2};
use crate::error::GfxResult;
use crate::render::{
    uniform, DrawCall, FramebufferId, GeometryId, GraphicsContext, PassTarget, ShaderId,
    ShaderSource, TextureId, Vertex,
};

use super::{PipelineData, WindowInfo};

/// Resources shared by every stage that renders into its own framebuffer.
///
/// Owns one shader, one quad and one framebuffer. The framebuffer is never
/// resized in place: [`RendererCore::construct_fbo`] destroys it and
/// allocates a new one, re-uploading the orthographic projection of the
/// window's design size.
#[derive(Debug)]
pub struct RendererCore {
    source: ShaderSource,
    shader: Option<ShaderId>,
    quad: Option<GeometryId>,
    framebuffer: Option<FramebufferId>,
    projection: Mat4,
    initial_size: Vec2,
    fb_pos: Vec2,
    fb_size: Vec2,
}

impl RendererCore {
    pub fn new(source: ShaderSource) -> Self {
        Self {
            source,
            shader: None,
            quad: None,
            framebuffer: None,
            projection: Mat4::IDENTITY,
            initial_size: Vec2::ZERO,
            fb_pos: Vec2::ZERO,
            fb_size: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.source.label
    }

    /// Compiles the shader, uploads `quad` and allocates a framebuffer at the
    /// window's design size.
    pub fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo, quad: &[Vertex]) -> GfxResult<()> {
        if self.shader.is_some() {
            log::warn!("{}: construct called twice; ignored", self.label());
            return Ok(());
        }

        self.shader = Some(gfx.compile_shader(&self.source)?);
        self.quad = Some(gfx.create_geometry(&self.source.label, quad)?);
        self.initial_size = window.initial_size;

        self.construct_fbo(gfx, Vec2::ZERO, window.initial_size)
    }

    /// Replaces the framebuffer with a fresh one of `size` pixels.
    pub fn construct_fbo(&mut self, gfx: &mut dyn GraphicsContext, pos: Vec2, size: Vec2) -> GfxResult<()> {
        if let Some(old) = self.framebuffer.take() {
            gfx.destroy_framebuffer(old);
        }

        self.fb_pos = pos;
        self.fb_size = size;

        self.projection = Mat4::orthographic_rh(0.0, self.initial_size.x, self.initial_size.y, 0.0, -1.0, 1.0);
        if let Some(shader) = self.shader {
            gfx.set_uniform(shader, uniform::PROJECTION, self.projection.into());
        }

        let width = (size.x as u32).max(1);
        let height = (size.y as u32).max(1);
        self.framebuffer = Some(gfx.create_framebuffer(width, height)?);

        log::debug!("{}: framebuffer {width}x{height} at ({}, {})", self.label(), pos.x, pos.y);
        Ok(())
    }

    /// Follows the window's letterboxed viewport.
    pub fn on_resize(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.construct_fbo(gfx, window.viewport.pos, window.viewport.size)
    }

    #[inline]
    pub fn shader(&self) -> Option<ShaderId> {
        self.shader
    }

    #[inline]
    pub fn quad(&self) -> Option<GeometryId> {
        self.quad
    }

    #[inline]
    pub fn framebuffer(&self) -> Option<FramebufferId> {
        self.framebuffer
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn framebuffer_pos(&self) -> Vec2 {
        self.fb_pos
    }

    #[inline]
    pub fn framebuffer_size(&self) -> Vec2 {
        self.fb_size
    }

    pub fn output(&self, gfx: &dyn GraphicsContext) -> Option<TextureId> {
        gfx.framebuffer_texture(self.framebuffer?)
    }

    /// Clears the framebuffer and draws the incoming texture through the
    /// stage shader. Returns the token carrying the framebuffer's texture.
    pub fn filter<'a>(&self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        let (Some(shader), Some(geometry), Some(fb)) = (self.shader, self.quad, self.framebuffer) else {
            log::warn!("{}: stage has no resources; input passed through", self.label());
            return data;
        };

        gfx.begin_pass(PassTarget::Framebuffer(fb), Some(Color::TRANSPARENT));
        gfx.draw(DrawCall {
            shader,
            geometry,
            texture: data.texture,
        });
        gfx.end_pass();

        data.with_texture(gfx.framebuffer_texture(fb))
    }

    pub fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        if let Some(fb) = self.framebuffer.take() {
            gfx.destroy_framebuffer(fb);
        }
        if let Some(quad) = self.quad.take() {
            gfx.destroy_geometry(quad);
        }
        if let Some(shader) = self.shader.take() {
            gfx.destroy_shader(shader);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::render::{builtin, HeadlessContext, UniformValue};

    fn window() -> WindowInfo {
        WindowInfo::new(Vec2::new(320.0, 180.0))
    }

    fn constructed(gfx: &mut HeadlessContext) -> RendererCore {
        let mut core = RendererCore::new(builtin::blit());
        core.construct(gfx, &window(), &builtin::fullscreen_quad()).unwrap();
        core
    }

    #[test]
    fn construct_allocates_design_sized_framebuffer() {
        let mut gfx = HeadlessContext::new();
        let core = constructed(&mut gfx);

        let fb = core.framebuffer().unwrap();
        assert_eq!(gfx.framebuffer_size(fb), Some((320, 180)));
        assert_eq!(gfx.live_framebuffers(), 1);

        let expected = Mat4::orthographic_rh(0.0, 320.0, 180.0, 0.0, -1.0, 1.0);
        assert_eq!(
            gfx.uniform(core.shader().unwrap(), uniform::PROJECTION),
            Some(UniformValue::Mat4(expected))
        );
    }

    #[test]
    fn construct_fbo_replaces_framebuffer() {
        let mut gfx = HeadlessContext::new();
        let mut core = constructed(&mut gfx);
        let before = core.framebuffer().unwrap();

        core.construct_fbo(&mut gfx, Vec2::new(10.0, 0.0), Vec2::new(640.0, 360.0))
            .unwrap();

        let after = core.framebuffer().unwrap();
        assert_ne!(before, after);
        assert_eq!(gfx.framebuffer_size(before), None);
        assert_eq!(gfx.framebuffer_size(after), Some((640, 360)));
        assert_eq!(gfx.live_framebuffers(), 1);
        assert_eq!(core.framebuffer_pos(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn resize_follows_viewport() {
        let mut gfx = HeadlessContext::new();
        let mut core = constructed(&mut gfx);
        let resized = WindowInfo {
            viewport: Viewport::letterbox(window().initial_size, 1000, 1000),
            ..window()
        };
        core.on_resize(&mut gfx, &resized).unwrap();
        assert_eq!(gfx.framebuffer_size(core.framebuffer().unwrap()), Some((1000, 562)));
    }

    #[test]
    fn failed_compile_leaves_nothing_allocated() {
        let mut gfx = HeadlessContext::new();
        gfx.fail_shader("ember blit");
        let mut core = RendererCore::new(builtin::blit());
        let err = core
            .construct(&mut gfx, &window(), &builtin::fullscreen_quad())
            .unwrap_err();
        assert_eq!(err.code(), 0x32);
        assert!(core.framebuffer().is_none());
        assert_eq!(gfx.live_framebuffers(), 0);
    }

    #[test]
    fn release_frees_everything() {
        let mut gfx = HeadlessContext::new();
        let mut core = constructed(&mut gfx);
        core.release(&mut gfx);
        assert_eq!(gfx.live_framebuffers(), 0);
        assert_eq!(gfx.live_shaders(), 0);
        assert_eq!(gfx.live_geometries(), 0);
    }
}
