//! Tween engine.
//!
//! Time-driven interpolation of drawable and camera properties:
//! - `Ease` maps normalized time onto an eased fraction
//! - `Lerp` blends two values of a property type
//! - `Tween` is the Idle → Delaying → Active → Complete state machine
//! - `TweenSlot` holds the single active tween of one property
//!
//! All durations and deltas are in seconds.

mod ease;
mod lerp;
mod tween;

pub use ease::Ease;
pub use lerp::Lerp;
pub use tween::{Tween, TweenSlot, TweenState};
