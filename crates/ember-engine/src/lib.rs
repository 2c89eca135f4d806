//! Ember engine crate.
//!
//! 2D game rendering built around a composable render pipeline: cameras own
//! drawables, a [`pipeline::RenderPipeline`] renders each camera through an
//! ordered chain of stages (camera pass, post-processing effects, window
//! present), and [`anim`] tweens drive properties over time.
//!
//! GPU access goes through [`render::GraphicsContext`]; [`device::WgpuBackend`]
//! implements it with wgpu and [`render::HeadlessContext`] records calls
//! without a GPU.

pub mod anim;
pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod drawable;
pub mod error;
pub mod event;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod text;
pub mod time;
pub mod window;
