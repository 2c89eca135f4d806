//! Render pipeline: an ordered chain of stages turning cameras into pixels.
//!
//! Per flush and per camera a [`PipelineData`] token is threaded through the
//! stages in registration order:
//! - [`CameraRenderer`] draws the camera's drawables into its framebuffer
//! - effects sample the previous texture into their own framebuffer
//! - [`WindowRenderer`] presents the last texture into the window viewport
//!
//! Stages that own a framebuffer rebuild it on every resize, before the next
//! flush.

macro_rules! element_plumbing {
    () => {
        fn base(&self) -> &$crate::pipeline::ElementBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::pipeline::ElementBase {
            &mut self.base
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

mod camera_renderer;
mod effects;
mod element;
mod post_processing;
mod render_pipeline;
mod renderer;
mod window_renderer;

pub use camera_renderer::CameraRenderer;
pub use effects::{
    ChromaticEffect, ChromaticParams, CrtEffect, CustomShaderEffect, CustomShaderParams,
    SpeedLinesEffect, SpeedLinesParams,
};
pub use element::{ElementBase, ElementKind, PipelineData, PipelineElement, WindowInfo};
pub use post_processing::{Effect, PostProcessing, PostProcessingBuilder};
pub use render_pipeline::{ElementId, RenderPipeline};
pub use renderer::RendererCore;
pub use window_renderer::WindowRenderer;
