use crate::error::GfxResult;
use crate::pipeline::{ElementBase, ElementKind, PipelineData, PipelineElement, RendererCore, WindowInfo};
use crate::render::{builtin, uniform, GraphicsContext};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ChromaticParams {
    pub strength: f32,
}

/// Splits the color channels horizontally by `strength`.
#[derive(Debug)]
pub struct ChromaticEffect {
    base: ElementBase,
    core: RendererCore,
    strength: f32,
}

impl ChromaticEffect {
    pub fn new(params: ChromaticParams) -> Self {
        Self {
            base: ElementBase::default(),
            core: RendererCore::new(builtin::chromatic()),
            strength: params.strength,
        }
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Takes effect on the next pass.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    #[inline]
    pub fn core(&self) -> &RendererCore {
        &self.core
    }
}

impl PipelineElement for ChromaticEffect {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::Chromatic
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.construct(gfx, window, &builtin::fullscreen_quad())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        if let Some(shader) = self.core.shader() {
            gfx.set_uniform(shader, uniform::STRENGTH, self.strength.into());
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
    fn strength_reaches_shader() {
        let mut gfx = HeadlessContext::new();
        let mut fx = ChromaticEffect::new(ChromaticParams { strength: 0.5 });
        run_once(&mut gfx, &mut fx);
        fx.set_strength(0.25);
        fx.downstream(&mut gfx, PipelineData::default());

        let strengths: Vec<_> = gfx.draws().map(|d| d.uniform(uniform::STRENGTH)).collect();
        assert_eq!(
            strengths,
            vec![Some(UniformValue::F32(0.5)), Some(UniformValue::F32(0.25))]
        );
    }
}
