use crate::coords::Color;
use crate::error::GfxResult;
use crate::pipeline::{ElementBase, ElementKind, PipelineData, PipelineElement, RendererCore, WindowInfo};
use crate::render::{builtin, uniform, GraphicsContext};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpeedLinesParams {
    /// Radius of the clear center, in half-screen units.
    pub radius: f32,
    /// Line threshold; higher values thin the lines out.
    pub edge: f32,
    pub color: Color,
}

impl Default for SpeedLinesParams {
    fn default() -> Self {
        Self {
            radius: 12.0,
            edge: 0.3,
            color: Color::WHITE,
        }
    }
}

/// Animated radial lines added over the image.
#[derive(Debug)]
pub struct SpeedLinesEffect {
    base: ElementBase,
    core: RendererCore,
    params: SpeedLinesParams,
}

impl Default for SpeedLinesEffect {
    fn default() -> Self {
        Self::new(SpeedLinesParams::default())
    }
}

impl SpeedLinesEffect {
    pub fn new(params: SpeedLinesParams) -> Self {
        Self {
            base: ElementBase::default(),
            core: RendererCore::new(builtin::speed_lines()),
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> SpeedLinesParams {
        self.params
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.params.radius = radius;
    }

    pub fn set_edge(&mut self, edge: f32) {
        self.params.edge = edge;
    }

    pub fn set_color(&mut self, color: Color) {
        self.params.color = color;
    }

    #[inline]
    pub fn core(&self) -> &RendererCore {
        &self.core
    }
}

impl PipelineElement for SpeedLinesEffect {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::SpeedLines
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.construct(gfx, window, &builtin::fullscreen_quad())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        if let Some(shader) = self.core.shader() {
            let time = gfx.elapsed();
            gfx.set_uniform(shader, uniform::TIME, time.into());
            gfx.set_uniform(shader, uniform::RADIUS, self.params.radius.into());
            gfx.set_uniform(shader, uniform::EDGE, self.params.edge.into());
            gfx.set_uniform(shader, uniform::LINE_COLOR, self.params.color.into());
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
