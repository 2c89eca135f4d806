use crate::error::GfxResult;
use crate::pipeline::{ElementBase, ElementKind, PipelineData, PipelineElement, RendererCore, WindowInfo};
use crate::render::{builtin, uniform, GraphicsContext};

/// Scanlines, vignette and barrel distortion animated by the context clock.
#[derive(Debug)]
pub struct CrtEffect {
    base: ElementBase,
    core: RendererCore,
}

impl Default for CrtEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl CrtEffect {
    pub fn new() -> Self {
        Self {
            base: ElementBase::default(),
            core: RendererCore::new(builtin::crt()),
        }
    }

    #[inline]
    pub fn core(&self) -> &RendererCore {
        &self.core
    }
}

impl PipelineElement for CrtEffect {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::Crt
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.construct(gfx, window, &builtin::fullscreen_quad())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        if let Some(shader) = self.core.shader() {
            let time = gfx.elapsed();
            gfx.set_uniform(shader, uniform::TIME, time.into());
        }
        self.core.filter(gfx, data)
    }

    fn on_resize(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.on_resize(gfx, window)
    }

    fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        self.core.release(gfx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::effects::testing::run_once;
    use crate::render::{HeadlessContext, UniformValue};

    #[test]
    fn uploads_time_each_pass() {
        let mut gfx = HeadlessContext::new();
        gfx.set_elapsed(2.5);
        let mut crt = CrtEffect::new();
        let (input, out) = run_once(&mut gfx, &mut crt);

        let draw = gfx.draws().next().unwrap();
        assert_eq!(draw.uniform(uniform::TIME), Some(UniformValue::F32(2.5)));
        assert_eq!(draw.call.texture, Some(input));
        assert!(out.texture.is_some());
        assert_ne!(out.texture, Some(input));
    }
}
