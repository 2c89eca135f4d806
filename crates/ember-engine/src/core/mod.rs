//! Contract between the runtime loop and the game.
//!
//! The runtime owns the platform window and GPU; games implement [`App`] and
//! see the [`crate::window::GameWindow`] plus a graphics context per call.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx};
