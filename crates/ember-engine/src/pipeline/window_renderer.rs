use crate::error::GfxResult;
use crate::render::{builtin, DrawCall, GeometryId, GraphicsContext, PassTarget, ShaderId};

use super::{ElementBase, ElementKind, PipelineData, PipelineElement, WindowInfo};

/// Terminal stage: copies the incoming texture into the window viewport.
///
/// Owns no framebuffer. Returns an empty token.
#[derive(Debug, Default)]
pub struct WindowRenderer {
    base: ElementBase,
    shader: Option<ShaderId>,
    quad: Option<GeometryId>,
}

impl WindowRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PipelineElement for WindowRenderer {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::WindowRenderer
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, _window: &WindowInfo) -> GfxResult<()> {
        self.shader = Some(gfx.compile_shader(&builtin::blit())?);
        self.quad = Some(gfx.create_geometry("ember window quad", &builtin::fullscreen_quad())?);
        Ok(())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        let (Some(shader), Some(geometry)) = (self.shader, self.quad) else {
            log::warn!("window renderer: stage has no resources; input passed through");
            return data;
        };

        let Some(texture) = data.texture else {
            log::debug!("window renderer: no input texture; nothing presented");
            return PipelineData::default();
        };

        gfx.begin_pass(
            PassTarget::Screen {
                viewport: self.base.viewport,
            },
            None,
        );
        gfx.draw(DrawCall {
            shader,
            geometry,
            texture: Some(texture),
        });
        gfx.end_pass();

        PipelineData::default()
    }

    fn release(&mut self, gfx: &mut dyn GraphicsContext) {
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
    use crate::coords::{Vec2, Viewport};
    use crate::render::HeadlessContext;

    #[test]
    fn presents_into_viewport_and_returns_empty_token() {
        let mut gfx = HeadlessContext::new();
        let window = WindowInfo::new(Vec2::new(160.0, 90.0));
        let mut stage = WindowRenderer::new();
        stage.construct(&mut gfx, &window).unwrap();

        let viewport = Viewport::new(Vec2::new(0.0, 10.0), Vec2::new(160.0, 90.0));
        stage.set_viewport(viewport);

        let input = gfx.create_texture(1, 1, &[0; 4]).unwrap();
        let out = stage.downstream(&mut gfx, PipelineData::default().with_texture(Some(input)));

        assert_eq!(out, PipelineData::default());
        let draw = gfx.draws().next().unwrap();
        assert_eq!(draw.target, PassTarget::Screen { viewport });
        assert_eq!(draw.call.texture, Some(input));
        assert_eq!(gfx.live_framebuffers(), 0);
    }

    #[test]
    fn placeholder_token_draws_nothing() {
        let mut gfx = HeadlessContext::new();
        let mut stage = WindowRenderer::new();
        stage.construct(&mut gfx, &WindowInfo::default()).unwrap();
        let out = stage.downstream(&mut gfx, PipelineData::default());
        assert_eq!(out, PipelineData::default());
        assert_eq!(gfx.draw_count(), 0);
    }
}
