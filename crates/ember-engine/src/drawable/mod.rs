//! Things a [`crate::camera::Camera`] can render.
//!
//! Drawables are shared (`Rc<RefCell<..>>`) between the application and any
//! number of cameras; a camera only keeps a reference, so removing a
//! drawable from a camera never destroys it.
//!
//! The camera renderer dispatches on [`Drawable::kind`]:
//! - [`DrawableKind::Sprite`], [`DrawableKind::Text`], [`DrawableKind::Video`]
//!   are drawn by the renderer with its own shaders
//! - [`DrawableKind::Custom`] draws itself through [`Drawable::draw`] inside
//!   the camera's pass

mod animation;
mod sprite;
mod text;
mod video;

pub use animation::{AnimationFrame, AnimationPlayer, FrameAnimation};
pub use sprite::Sprite;
pub use text::Text;
pub use video::VideoPlayer;

use std::cell::RefCell;
use std::rc::Rc;

use crate::render::GraphicsContext;

pub type SharedDrawable = Rc<RefCell<dyn Drawable>>;

/// Borrowed view of a drawable used for renderer dispatch.
pub enum DrawableKind<'a> {
    Sprite(&'a Sprite),
    Text(&'a Text),
    Video(&'a VideoPlayer),
    Custom,
}

pub trait Drawable {
    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Advances animation state by `dt` seconds.
    fn update(&mut self, _dt: f32) {}

    /// Immediate drawing for [`DrawableKind::Custom`] drawables.
    fn draw(&mut self, _gfx: &mut dyn GraphicsContext) {}

    fn kind(&self) -> DrawableKind<'_> {
        DrawableKind::Custom
    }
}

/// Wraps a drawable for sharing with cameras.
pub fn shared<D: Drawable + 'static>(drawable: D) -> Rc<RefCell<D>> {
    Rc::new(RefCell::new(drawable))
}
