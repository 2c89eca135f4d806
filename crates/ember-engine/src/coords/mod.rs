//! Coordinate and value types shared by cameras, drawables and the pipeline.
//!
//! Canonical 2D space:
//! - design pixels of the window's initial size
//! - origin top-left
//! - +X right, +Y down
//!
//! The pipeline maps design space onto the letterboxed window viewport.

mod axis;
mod color;
mod vec2;
mod viewport;

pub use axis::Axis;
pub use color::Color;
pub use vec2::Vec2;
pub use viewport::Viewport;
