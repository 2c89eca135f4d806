//! 2D and 3D cameras.
//!
//! A camera owns its transform and tweens, and keeps non-owning references
//! to the drawables it renders.

mod camera2d;
mod camera3d;

pub use camera2d::{Camera, CameraId};
pub use camera3d::{Camera3D, FreelookConfig};

use std::rc::Rc;

use crate::drawable::SharedDrawable;

/// Ordered list of shared drawables.
#[derive(Default)]
pub(crate) struct DrawableList {
    items: Vec<SharedDrawable>,
}

impl DrawableList {
    pub(crate) fn add(&mut self, drawable: SharedDrawable) {
        self.items.push(drawable);
    }

    /// Removes the first entry pointing at the same drawable. No-op if absent.
    pub(crate) fn remove(&mut self, drawable: &SharedDrawable) -> bool {
        let found = self
            .items
            .iter()
            .position(|d| std::ptr::addr_eq(Rc::as_ptr(d), Rc::as_ptr(drawable)));
        match found {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn as_slice(&self) -> &[SharedDrawable] {
        &self.items
    }

    /// Updates every drawable. Ones already borrowed elsewhere skip this step.
    pub(crate) fn update(&self, dt: f32) {
        for drawable in &self.items {
            match drawable.try_borrow_mut() {
                Ok(mut drawable) => drawable.update(dt),
                Err(_) => log::warn!("camera: drawable is borrowed elsewhere; update skipped"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::drawable::{shared, Drawable, Sprite};

    #[test]
    fn update_skips_borrowed_drawable() {
        let held = shared(Sprite::default());
        let free = shared(Sprite::default());
        held.borrow_mut().tween_position(Vec2::new(10.0, 0.0), 1.0, crate::anim::Ease::Linear, 0.0);
        free.borrow_mut().tween_position(Vec2::new(10.0, 0.0), 1.0, crate::anim::Ease::Linear, 0.0);

        let mut list = DrawableList::default();
        list.add(held.clone());
        list.add(free.clone());

        {
            let _guard = held.borrow();
            list.update(0.5);
        }
        assert_eq!(held.borrow().pos, Vec2::ZERO);
        assert_eq!(free.borrow().pos, Vec2::new(5.0, 0.0));

        list.update(0.5);
        assert_eq!(held.borrow().pos, Vec2::new(5.0, 0.0));
        assert!(held.borrow().visible());
    }
}
