use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Mat4, Vec3};

use crate::anim::{Ease, Tween, TweenSlot};
use crate::coords::Vec2;
use crate::drawable::SharedDrawable;

use super::DrawableList;

/// Smallest zoom used when building the view; keeps the matrix invertible.
const MIN_ZOOM: f32 = 1e-4;

/// Process-unique camera identity, used for per-stage exclusion.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CameraId(u32);

impl CameraId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

/// 2D camera over a design-sized world.
///
/// `zoom` scales around the center of the initial window size and
/// `rotation` (degrees) pivots around that same center.
pub struct Camera {
    id: CameraId,
    pub pos: Vec2,
    pub zoom: f32,
    pub rotation: f32,
    initial_size: Vec2,
    drawables: DrawableList,

    pos_tween: TweenSlot<Vec2>,
    zoom_tween: TweenSlot<f32>,
    rotation_tween: TweenSlot<f32>,
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("id", &self.id)
            .field("pos", &self.pos)
            .field("zoom", &self.zoom)
            .field("rotation", &self.rotation)
            .field("drawables", &self.drawables.as_slice().len())
            .finish()
    }
}

impl Camera {
    pub fn new(initial_size: Vec2) -> Self {
        Self {
            id: CameraId::next(),
            pos: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            initial_size,
            drawables: DrawableList::default(),
            pos_tween: TweenSlot::new(),
            zoom_tween: TweenSlot::new(),
            rotation_tween: TweenSlot::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> CameraId {
        self.id
    }

    #[inline]
    pub fn initial_size(&self) -> Vec2 {
        self.initial_size
    }

    // ── drawables ─────────────────────────────────────────────────────────

    pub fn add(&mut self, drawable: SharedDrawable) {
        self.drawables.add(drawable);
    }

    /// Removes `drawable` if present. The drawable itself is left untouched.
    pub fn remove(&mut self, drawable: &SharedDrawable) -> bool {
        self.drawables.remove(drawable)
    }

    pub fn remove_all(&mut self) {
        self.drawables.clear();
    }

    #[inline]
    pub fn drawables(&self) -> &[SharedDrawable] {
        self.drawables.as_slice()
    }

    /// Updates every drawable, then steps the camera's own tweens.
    pub fn update(&mut self, dt: f32) {
        self.drawables.update(dt);

        self.pos_tween.step(dt, &mut self.pos);
        self.zoom_tween.step(dt, &mut self.zoom);
        self.rotation_tween.step(dt, &mut self.rotation);
    }

    /// View transform zooming and rotating around the viewport center.
    pub fn calculate_view(&self) -> Mat4 {
        let zoom = self.zoom.max(MIN_ZOOM);
        let half = self.initial_size * (zoom / 2.0);
        let diff = self.initial_size * zoom - self.initial_size;

        Mat4::from_translation(half.extend())
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_translation(-half.extend())
            * Mat4::from_translation((-diff / 2.0).extend())
            * Mat4::from_scale(Vec3::new(zoom, zoom, 1.0))
    }

    // ── tweens ────────────────────────────────────────────────────────────

    pub fn tween_position(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.pos_tween
            .set(Tween::new(self.pos, to, duration, ease).with_delay(delay));
    }

    pub fn tween_zoom(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.zoom_tween
            .set(Tween::new(self.zoom, to, duration, ease).with_delay(delay));
    }

    pub fn tween_rotation(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.rotation_tween
            .set(Tween::new(self.rotation, to, duration, ease).with_delay(delay));
    }

    pub fn cancel_position(&mut self) {
        self.pos_tween.cancel();
    }

    pub fn cancel_zoom(&mut self) {
        self.zoom_tween.cancel();
    }

    pub fn cancel_rotation(&mut self) {
        self.rotation_tween.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::drawable::{shared, Drawable, Sprite};

    fn approx(a: glam::Vec3, b: glam::Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    fn apply(m: Mat4, x: f32, y: f32) -> glam::Vec3 {
        m.transform_point3(glam::Vec3::new(x, y, 0.0))
    }

    // ── view ──────────────────────────────────────────────────────────────

    #[test]
    fn default_view_is_identity() {
        let cam = Camera::new(Vec2::new(800.0, 600.0));
        let view = cam.calculate_view();
        assert!(view.abs_diff_eq(Mat4::IDENTITY, 1e-6));
        for (x, y) in [(0.0, 0.0), (123.0, 45.0), (800.0, 600.0)] {
            assert!(approx(apply(view, x, y), glam::Vec3::new(x, y, 0.0)));
        }
    }

    #[test]
    fn zoom_keeps_center_fixed() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.zoom = 2.0;
        let view = cam.calculate_view();
        assert!(approx(apply(view, 400.0, 300.0), glam::Vec3::new(400.0, 300.0, 0.0)));
        assert!(approx(apply(view, 0.0, 0.0), glam::Vec3::new(-400.0, -300.0, 0.0)));
    }

    #[test]
    fn rotation_pivots_on_center() {
        let mut cam = Camera::new(Vec2::new(100.0, 100.0));
        cam.rotation = 90.0;
        let view = cam.calculate_view();
        assert!(approx(apply(view, 50.0, 50.0), glam::Vec3::new(50.0, 50.0, 0.0)));
        assert!(approx(apply(view, 100.0, 50.0), glam::Vec3::new(50.0, 100.0, 0.0)));
    }

    #[test]
    fn zero_zoom_is_clamped() {
        let mut cam = Camera::new(Vec2::new(100.0, 100.0));
        cam.zoom = 0.0;
        assert!(cam.calculate_view().determinant() != 0.0);
    }

    // ── drawables ─────────────────────────────────────────────────────────

    #[test]
    fn remove_leaves_drawable_alive() {
        let mut cam = Camera::new(Vec2::new(10.0, 10.0));
        let sprite = shared(Sprite::default());
        let handle: SharedDrawable = sprite.clone();

        cam.add(handle.clone());
        assert_eq!(cam.drawables().len(), 1);
        assert!(cam.remove(&handle));
        assert!(!cam.remove(&handle));
        assert!(cam.drawables().is_empty());
        assert!(sprite.borrow().visible());
    }

    #[test]
    fn update_reaches_drawables_then_tweens() {
        let mut cam = Camera::new(Vec2::new(10.0, 10.0));
        let sprite = Rc::new(RefCell::new(Sprite::default()));
        sprite
            .borrow_mut()
            .tween_position(Vec2::new(4.0, 0.0), 1.0, Ease::Linear, 0.0);
        cam.add(sprite.clone());
        cam.tween_zoom(3.0, 1.0, Ease::Linear, 0.0);

        cam.update(0.5);

        assert_eq!(sprite.borrow().pos, Vec2::new(2.0, 0.0));
        assert_eq!(cam.zoom, 2.0);
    }

    #[test]
    fn ids_are_unique() {
        let a = Camera::new(Vec2::ONE);
        let b = Camera::new(Vec2::ONE);
        assert_ne!(a.id(), b.id());
    }
}
