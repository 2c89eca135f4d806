use crate::anim::{Ease, Tween, TweenSlot};
use crate::coords::{Axis, Color, Vec2};
use crate::render::TextureId;

use super::{AnimationFrame, AnimationPlayer, Drawable, DrawableKind, FrameAnimation};

/// Textured quad.
///
/// `pos`/`size` are in design pixels. `scale` grows the quad around its
/// center, `rotation` is in degrees around the center, and `offset` shifts
/// the quad after rotation. `texture_offset`/`texture_size` select the
/// sampled sub-rectangle in UV space.
///
/// Frame animations registered with [`Sprite::add_animation`] drive the
/// texture, UV rectangle, size, rotation and offset. They are stepped
/// before the property tweens.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub pos: Vec2,
    pub size: Vec2,
    pub scale: Vec2,
    pub offset: Vec2,
    /// How much of the camera movement applies to this sprite.
    pub scroll_factor: Vec2,
    pub texture: Option<TextureId>,
    pub color: Color,
    pub flip_x: bool,
    pub flip_y: bool,
    pub texture_offset: Vec2,
    pub texture_size: Vec2,
    pub rotation: f32,
    pub visible: bool,

    pos_tween: TweenSlot<Vec2>,
    size_tween: TweenSlot<Vec2>,
    scale_tween: TweenSlot<Vec2>,
    color_tween: TweenSlot<Color>,
    rotation_tween: TweenSlot<f32>,
    offset_tween: TweenSlot<Vec2>,

    animations: AnimationPlayer,
    auto_anim_center: Option<(Axis, Vec2)>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            scroll_factor: Vec2::ONE,
            texture: None,
            color: Color::WHITE,
            flip_x: false,
            flip_y: false,
            texture_offset: Vec2::ZERO,
            texture_size: Vec2::ONE,
            rotation: 0.0,
            visible: true,
            pos_tween: TweenSlot::new(),
            size_tween: TweenSlot::new(),
            scale_tween: TweenSlot::new(),
            color_tween: TweenSlot::new(),
            rotation_tween: TweenSlot::new(),
            offset_tween: TweenSlot::new(),
            animations: AnimationPlayer::new(),
            auto_anim_center: None,
        }
    }
}

impl Sprite {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            ..Self::default()
        }
    }

    /// Sets the texture and resizes the sprite to the texture's pixel size.
    pub fn set_texture(&mut self, texture: TextureId, width: u32, height: u32) {
        self.texture = Some(texture);
        self.size = Vec2::new(width as f32, height as f32);
    }

    /// Centers the sprite inside a `container` anchored at the origin.
    pub fn center(&mut self, axis: Axis, container: Vec2) {
        if axis.has_x() {
            self.pos.x = container.x / 2.0 - self.size.x / 2.0;
        }
        if axis.has_y() {
            self.pos.y = container.y / 2.0 - self.size.y / 2.0;
        }
    }

    // ── frame animations ──────────────────────────────────────────────────

    pub fn add_animation(&mut self, name: impl Into<String>, animation: FrameAnimation) {
        self.animations.add(name, animation);
    }

    pub fn add_all_animations<I, S>(&mut self, animations: I)
    where
        I: IntoIterator<Item = (S, FrameAnimation)>,
        S: Into<String>,
    {
        self.animations.add_all(animations);
    }

    pub fn animation(&self, name: &str) -> Option<&FrameAnimation> {
        self.animations.get(name)
    }

    /// Restarts `name` from its first frame; returns false if unknown.
    pub fn play_animation(&mut self, name: &str) -> bool {
        self.animations.play(name)
    }

    pub fn set_default_animation(&mut self, name: &str) -> bool {
        self.animations.set_default(name)
    }

    pub fn current_animation(&self) -> Option<&FrameAnimation> {
        self.animations.current()
    }

    pub fn current_animation_name(&self) -> Option<&str> {
        self.animations.current_name()
    }

    /// Re-centers the sprite in `container` every time a frame is applied.
    pub fn enable_auto_animation_center(&mut self, axis: Axis, container: Vec2) {
        self.auto_anim_center = Some((axis, container));
    }

    pub fn disable_auto_animation_center(&mut self) {
        self.auto_anim_center = None;
    }

    fn apply_frame(&mut self, frame: &AnimationFrame) {
        self.texture = Some(frame.texture);
        self.size = frame.pixel_size();
        self.rotation = frame.rotation;
        self.offset = frame.offset;
        self.texture_offset = frame.uv_pos;
        self.texture_size = frame.uv_size;
        if let Some((axis, container)) = self.auto_anim_center {
            self.center(axis, container);
        }
    }

    // ── tweens ────────────────────────────────────────────────────────────

    pub fn tween_position(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.pos_tween
            .set(Tween::new(self.pos, to, duration, ease).with_delay(delay));
    }

    pub fn tween_size(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.size_tween
            .set(Tween::new(self.size, to, duration, ease).with_delay(delay));
    }

    pub fn tween_scale(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.scale_tween
            .set(Tween::new(self.scale, to, duration, ease).with_delay(delay));
    }

    pub fn tween_color(&mut self, to: Color, duration: f32, ease: Ease, delay: f32) {
        self.color_tween
            .set(Tween::new(self.color, to, duration, ease).with_delay(delay));
    }

    pub fn tween_rotation(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.rotation_tween
            .set(Tween::new(self.rotation, to, duration, ease).with_delay(delay));
    }

    pub fn tween_offset(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.offset_tween
            .set(Tween::new(self.offset, to, duration, ease).with_delay(delay));
    }

    pub fn cancel_position(&mut self) {
        self.pos_tween.cancel();
    }

    pub fn cancel_size(&mut self) {
        self.size_tween.cancel();
    }

    pub fn cancel_scale(&mut self) {
        self.scale_tween.cancel();
    }

    pub fn cancel_color(&mut self) {
        self.color_tween.cancel();
    }

    pub fn cancel_rotation(&mut self) {
        self.rotation_tween.cancel();
    }

    pub fn cancel_offset(&mut self) {
        self.offset_tween.cancel();
    }

    /// True while any property tween is delaying or running.
    pub fn is_animating(&self) -> bool {
        self.pos_tween.is_running()
            || self.size_tween.is_running()
            || self.scale_tween.is_running()
            || self.color_tween.is_running()
            || self.rotation_tween.is_running()
            || self.offset_tween.is_running()
    }
}

impl Drawable for Sprite {
    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn update(&mut self, dt: f32) {
        if let Some(frame) = self.animations.update(dt) {
            self.apply_frame(&frame);
        }

        self.pos_tween.step(dt, &mut self.pos);
        self.size_tween.step(dt, &mut self.size);
        self.scale_tween.step(dt, &mut self.scale);
        self.color_tween.step(dt, &mut self.color);
        self.rotation_tween.step(dt, &mut self.rotation);
        self.offset_tween.step(dt, &mut self.offset);
    }

    fn kind(&self) -> DrawableKind<'_> {
        DrawableKind::Sprite(self)
    }
}
