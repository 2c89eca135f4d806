//! Game window and the platform runtime loop.
//!
//! [`GameWindow`] holds the cameras, render pipeline and event subscribers.
//! [`Runtime`] owns the `winit` event loop, the window and the GPU, and
//! drives one `GameWindow` from them.

mod game_window;
mod runtime;

pub use game_window::GameWindow;
pub use runtime::{Runtime, RuntimeConfig};
