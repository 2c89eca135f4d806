//! Post-processing stages.
//!
//! Each effect samples the previous stage's texture through its own shader
//! into its own framebuffer and hands that framebuffer's texture on.

mod chromatic;
mod crt;
mod custom;
mod speed_lines;

pub use chromatic::{ChromaticEffect, ChromaticParams};
pub use crt::CrtEffect;
pub use custom::{CustomShaderEffect, CustomShaderParams};
pub use speed_lines::{SpeedLinesEffect, SpeedLinesParams};

#[cfg(test)]
pub(crate) mod testing {
    use crate::coords::Vec2;
    use crate::pipeline::{PipelineData, PipelineElement, WindowInfo};
    use crate::render::{GraphicsContext, HeadlessContext, TextureId};

    pub(crate) fn window() -> WindowInfo {
        WindowInfo::new(Vec2::new(64.0, 32.0))
    }

    /// Constructs `stage`, runs one pass on a fresh input texture and
    /// returns `(input, output)`.
    pub(crate) fn run_once(
        gfx: &mut HeadlessContext,
        stage: &mut dyn PipelineElement,
    ) -> (TextureId, PipelineData<'static>) {
        stage.construct(gfx, &window()).unwrap();
        let input = gfx.create_texture(1, 1, &[0; 4]).unwrap();
        let out = stage.downstream(gfx, PipelineData::default().with_texture(Some(input)));
        (input, out)
    }
}
