use crate::error::GfxResult;
use crate::render::GraphicsContext;

use super::{
    CameraRenderer, ChromaticEffect, ChromaticParams, CrtEffect, CustomShaderEffect, CustomShaderParams,
    PipelineElement, RenderPipeline, SpeedLinesEffect, SpeedLinesParams, WindowInfo, WindowRenderer,
};

/// Post-processing effect to insert between the camera and window stages.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Accepted for compatibility; adds no stage.
    Bloom,
    Crt,
    Chromatic(ChromaticParams),
    SpeedLines(SpeedLinesParams),
    CustomShader(CustomShaderParams),
}

impl Effect {
    fn into_element(self) -> Option<Box<dyn PipelineElement>> {
        match self {
            Effect::Bloom => None,
            Effect::Crt => Some(Box::new(CrtEffect::new())),
            Effect::Chromatic(params) => Some(Box::new(ChromaticEffect::new(params))),
            Effect::SpeedLines(params) => Some(Box::new(SpeedLinesEffect::new(params))),
            Effect::CustomShader(params) => Some(Box::new(CustomShaderEffect::new(params))),
        }
    }
}

/// Entry point for building effect pipelines.
pub struct PostProcessing;

impl PostProcessing {
    pub fn builder() -> PostProcessingBuilder {
        PostProcessingBuilder::default()
    }
}

/// Collects effects, then builds
/// `[CameraRenderer, effects.., WindowRenderer]`.
#[derive(Debug, Clone, Default)]
pub struct PostProcessingBuilder {
    effects: Vec<Effect>,
}

impl PostProcessingBuilder {
    pub fn add_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Constructs every stage. On failure nothing is leaked: stages built so
    /// far are released before the error is returned.
    pub fn build(self, gfx: &mut dyn GraphicsContext, window: WindowInfo) -> GfxResult<RenderPipeline> {
        let mut pipeline = RenderPipeline::new(window);
        match Self::populate(&mut pipeline, gfx, self.effects) {
            Ok(()) => Ok(pipeline),
            Err(e) => {
                pipeline.release(gfx);
                Err(e)
            }
        }
    }

    fn populate(pipeline: &mut RenderPipeline, gfx: &mut dyn GraphicsContext, effects: Vec<Effect>) -> GfxResult<()> {
        pipeline.add_element(gfx, CameraRenderer::new())?;
        for effect in effects {
            match effect.into_element() {
                Some(element) => {
                    pipeline.add_boxed(gfx, element)?;
                }
                None => log::debug!("post processing: bloom has no stage; skipped"),
            }
        }
        pipeline.add_element(gfx, WindowRenderer::new())?;
        Ok(())
    }
}
