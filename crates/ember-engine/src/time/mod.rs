//! Frame timing.
//!
//! Call [`FrameClock::tick`] once per presented frame to obtain the clamped
//! delta that drives tweens and camera updates.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
