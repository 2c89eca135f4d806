use crate::render::GraphicsContext;
use crate::time::FrameTime;
use crate::window::GameWindow;

/// Context handed to [`super::App::setup`].
pub struct SetupCtx<'a> {
    pub window: &'a mut GameWindow,
    pub gfx: &'a mut dyn GraphicsContext,
}

/// Per-frame context passed to [`super::App::on_frame`].
pub struct FrameCtx<'a> {
    pub window: &'a mut GameWindow,
    pub gfx: &'a mut dyn GraphicsContext,
    pub time: FrameTime,
}

impl FrameCtx<'_> {
    /// Seconds since the previous frame, clamped by the frame clock.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.time.dt
    }
}
