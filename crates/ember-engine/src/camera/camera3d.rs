use std::fmt;

use glam::{Mat4, Vec3};

use crate::anim::{Ease, Tween, TweenSlot};
use crate::coords::Vec2;
use crate::drawable::SharedDrawable;

use super::DrawableList;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Mouse-look tuning for [`Camera3D`].
///
/// A bounds pair `(min, max)` of `(0, 0)` disables clamping on that axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FreelookConfig {
    /// Degrees per pixel of mouse movement.
    pub speed: f32,
    pub pitch_bounds: (f32, f32),
    pub yaw_bounds: (f32, f32),
}

impl Default for FreelookConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            pitch_bounds: (-90.0, 90.0),
            yaw_bounds: (0.0, 0.0),
        }
    }
}

fn clamp_to(value: f32, (min, max): (f32, f32)) -> f32 {
    if min == 0.0 && max == 0.0 {
        value
    } else {
        value.clamp(min.min(max), max.max(min))
    }
}

/// Perspective camera driven by yaw/pitch angles (degrees).
pub struct Camera3D {
    pub pos: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Extra rotation (degrees) applied after the look-at, X then Y then Z.
    pub rotation: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,

    initial_size: Vec2,
    drawables: DrawableList,

    freelook: bool,
    freelook_config: FreelookConfig,
    last_mouse: Option<Vec2>,

    pos_tween: TweenSlot<Vec3>,
    rotation_tween: TweenSlot<Vec3>,
    pitch_tween: TweenSlot<f32>,
    yaw_tween: TweenSlot<f32>,
}

impl fmt::Debug for Camera3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera3D")
            .field("pos", &self.pos)
            .field("front", &self.front)
            .field("yaw", &self.yaw)
            .field("pitch", &self.pitch)
            .field("fov", &self.fov)
            .field("freelook", &self.freelook)
            .finish()
    }
}

impl Camera3D {
    pub fn new(initial_size: Vec2) -> Self {
        let mut cam = Self {
            pos: Vec3::ZERO,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            rotation: Vec3::ZERO,
            yaw: 90.0,
            pitch: 0.0,
            fov: 45.0,
            initial_size,
            drawables: DrawableList::default(),
            freelook: false,
            freelook_config: FreelookConfig::default(),
            last_mouse: None,
            pos_tween: TweenSlot::new(),
            rotation_tween: TweenSlot::new(),
            pitch_tween: TweenSlot::new(),
            yaw_tween: TweenSlot::new(),
        };
        cam.update_basis();
        cam
    }

    #[inline]
    pub fn initial_size(&self) -> Vec2 {
        self.initial_size
    }

    pub fn add(&mut self, drawable: SharedDrawable) {
        self.drawables.add(drawable);
    }

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

    /// Recomputes `front`/`right`/`up` from yaw and pitch.
    pub fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Refreshes the basis and returns the view transform.
    pub fn calculate_view(&mut self) -> Mat4 {
        self.update_basis();

        Mat4::look_at_rh(self.pos, self.pos + self.front, self.up)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, NEAR, FAR)
    }

    // ── freelook ──────────────────────────────────────────────────────────

    /// Enables or disables mouse look. The next mouse sample only seeds the
    /// last position.
    pub fn set_freelook(&mut self, enabled: bool) {
        self.freelook = enabled;
        self.last_mouse = None;
    }

    #[inline]
    pub fn freelook(&self) -> bool {
        self.freelook
    }

    pub fn set_freelook_config(&mut self, config: FreelookConfig) {
        self.freelook_config = config;
    }

    #[inline]
    pub fn freelook_config(&self) -> FreelookConfig {
        self.freelook_config
    }

    /// Converts an absolute mouse position into yaw/pitch increments.
    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        if !self.freelook {
            return;
        }

        let Some(last) = self.last_mouse.replace(Vec2::new(x, y)) else {
            return;
        };

        let speed = self.freelook_config.speed;
        self.yaw = clamp_to(self.yaw + (x - last.x) * speed, self.freelook_config.yaw_bounds);
        self.pitch = clamp_to(self.pitch + (last.y - y) * speed, self.freelook_config.pitch_bounds);
    }

    pub fn update(&mut self, dt: f32) {
        self.drawables.update(dt);

        self.pos_tween.step(dt, &mut self.pos);
        self.rotation_tween.step(dt, &mut self.rotation);
        self.pitch_tween.step(dt, &mut self.pitch);
        self.yaw_tween.step(dt, &mut self.yaw);
    }

    // ── tweens ────────────────────────────────────────────────────────────

    pub fn tween_position(&mut self, to: Vec3, duration: f32, ease: Ease, delay: f32) {
        self.pos_tween
            .set(Tween::new(self.pos, to, duration, ease).with_delay(delay));
    }

    pub fn tween_rotation(&mut self, to: Vec3, duration: f32, ease: Ease, delay: f32) {
        self.rotation_tween
            .set(Tween::new(self.rotation, to, duration, ease).with_delay(delay));
    }

    pub fn tween_pitch(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.pitch_tween
            .set(Tween::new(self.pitch, to, duration, ease).with_delay(delay));
    }

    pub fn tween_yaw(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.yaw_tween
            .set(Tween::new(self.yaw, to, duration, ease).with_delay(delay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn default_basis_looks_down_positive_z() {
        let cam = Camera3D::new(Vec2::new(800.0, 600.0));
        assert!(near(cam.front, Vec3::Z));
        assert!(near(cam.up, Vec3::Y));
        assert!(near(cam.right, Vec3::NEG_X));
        assert!(cam.front.dot(cam.right).abs() < 1e-5);
    }

    #[test]
    fn view_matches_look_at_without_rotation() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.pos = Vec3::new(1.0, 2.0, 3.0);
        let expected = Mat4::look_at_rh(cam.pos, cam.pos + Vec3::Z, Vec3::Y);
        assert!(cam.calculate_view().abs_diff_eq(expected, 1e-5));
    }

    // ── freelook ──────────────────────────────────────────────────────────

    #[test]
    fn first_sample_is_ignored() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.set_freelook(true);

        cam.on_mouse_move(500.0, 500.0);
        assert_eq!((cam.yaw, cam.pitch), (90.0, 0.0));

        cam.on_mouse_move(510.0, 490.0);
        assert!((cam.yaw - 91.0).abs() < 1e-5);
        assert!((cam.pitch - 1.0).abs() < 1e-5);
    }

    #[test]
    fn re_enabling_resets_last_position() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.set_freelook(true);
        cam.on_mouse_move(0.0, 0.0);
        cam.set_freelook(true);
        cam.on_mouse_move(1000.0, 0.0);
        assert_eq!(cam.yaw, 90.0);
    }

    #[test]
    fn disabled_freelook_ignores_mouse() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.on_mouse_move(0.0, 0.0);
        cam.on_mouse_move(100.0, 100.0);
        assert_eq!((cam.yaw, cam.pitch), (90.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped_yaw_is_free_by_default() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.set_freelook(true);
        cam.on_mouse_move(0.0, 0.0);
        cam.on_mouse_move(5000.0, -5000.0);
        assert_eq!(cam.pitch, 90.0);
        assert!((cam.yaw - 590.0).abs() < 1e-3);
    }

    #[test]
    fn yaw_bounds_apply_when_set() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.set_freelook_config(FreelookConfig {
            yaw_bounds: (45.0, 135.0),
            ..FreelookConfig::default()
        });
        cam.set_freelook(true);
        cam.on_mouse_move(0.0, 0.0);
        cam.on_mouse_move(-1000.0, 0.0);
        assert_eq!(cam.yaw, 45.0);
    }

    // ── tweens ────────────────────────────────────────────────────────────

    #[test]
    fn tweens_drive_angles_and_position() {
        let mut cam = Camera3D::new(Vec2::ONE);
        cam.tween_yaw(180.0, 1.0, Ease::Linear, 0.0);
        cam.tween_position(Vec3::new(0.0, 0.0, 10.0), 2.0, Ease::Linear, 0.0);
        cam.update(1.0);
        assert_eq!(cam.yaw, 180.0);
        assert!(near(cam.pos, Vec3::new(0.0, 0.0, 5.0)));
    }
}
