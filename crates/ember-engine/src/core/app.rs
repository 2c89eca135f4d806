use crate::event::Event;
use crate::window::GameWindow;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by games.
pub trait App {
    /// Called once after the window and graphics backend exist.
    ///
    /// Install a pipeline here; the default `[CameraRenderer, WindowRenderer]`
    /// pipeline is used when none is set.
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> anyhow::Result<()>;

    /// Called for every event after the window has handled it.
    fn on_event(&mut self, window: &mut GameWindow, event: &Event) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called once per frame, before the window updates and draws.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
