use std::borrow::Cow;

use crate::coords::Vec2;
use crate::error::GfxResult;
use crate::pipeline::{ElementBase, ElementKind, PipelineData, PipelineElement, RendererCore, WindowInfo};
use crate::render::{builtin, uniform, GraphicsContext, ShaderId, ShaderSource};

/// User fragment stage.
///
/// `fragment` is WGSL compiled against the shared prelude and must define
/// `fs_main(in: VertexOutput)`. The incoming texture is bound as `t_main`;
/// `globals.params.x` carries the time and `globals.tex_size.xy` the
/// framebuffer size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomShaderParams {
    pub label: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl CustomShaderParams {
    pub fn new(label: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            fragment: fragment.into(),
        }
    }
}

#[derive(Debug)]
pub struct CustomShaderEffect {
    base: ElementBase,
    core: RendererCore,
}

impl CustomShaderEffect {
    pub fn new(params: CustomShaderParams) -> Self {
        let source = ShaderSource::new(params.label, builtin::FULLSCREEN_VERTEX, params.fragment);
        Self {
            base: ElementBase::default(),
            core: RendererCore::new(source),
        }
    }

    /// Compiled shader, for setting extra uniforms.
    #[inline]
    pub fn shader(&self) -> Option<ShaderId> {
        self.core.shader()
    }

    #[inline]
    pub fn core(&self) -> &RendererCore {
        &self.core
    }

    fn upload_tex_size(&self, gfx: &mut dyn GraphicsContext) {
        if let Some(shader) = self.core.shader() {
            let size: Vec2 = self.core.framebuffer_size();
            gfx.set_uniform(shader, uniform::TEX_SIZE, size.into());
        }
    }
}

impl PipelineElement for CustomShaderEffect {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::CustomShader
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.construct(gfx, window, &builtin::fullscreen_quad())?;
        self.upload_tex_size(gfx);
        Ok(())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        if let Some(shader) = self.core.shader() {
            let time = gfx.elapsed();
            gfx.set_uniform(shader, uniform::TIME, time.into());
        }
        self.core.filter(gfx, data)
    }

    fn on_resize(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.on_resize(gfx, window)?;
        self.upload_tex_size(gfx);
        Ok(())
    }

    fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        self.core.release(gfx);
    }
}
