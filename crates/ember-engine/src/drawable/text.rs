use std::fmt;
use std::rc::Rc;

use crate::anim::{Ease, Tween, TweenSlot};
use crate::coords::{Axis, Color, Vec2};
use crate::text::Font;

use super::{Drawable, DrawableKind};

/// Single line of text drawn glyph by glyph.
///
/// `pos` is the pen origin on the baseline. `size` is the measured extent
/// and is refreshed by [`Text::set_text`].
pub struct Text {
    pub pos: Vec2,
    pub size: Vec2,
    pub scale: f32,
    pub offset: Vec2,
    /// Degrees, applied per glyph around the glyph center.
    pub rotation: f32,
    pub color: Color,
    pub visible: bool,

    font: Rc<dyn Font>,
    text: String,
    auto_center: Option<(Axis, Vec2)>,

    pos_tween: TweenSlot<Vec2>,
    scale_tween: TweenSlot<f32>,
    rotation_tween: TweenSlot<f32>,
    color_tween: TweenSlot<Color>,
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.text)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl Text {
    pub fn new(font: Rc<dyn Font>, text: impl Into<String>) -> Self {
        let mut t = Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            scale: 1.0,
            offset: Vec2::ZERO,
            rotation: 0.0,
            color: Color::WHITE,
            visible: true,
            font,
            text: String::new(),
            auto_center: None,
            pos_tween: TweenSlot::new(),
            scale_tween: TweenSlot::new(),
            rotation_tween: TweenSlot::new(),
            color_tween: TweenSlot::new(),
        };
        t.set_text(text);
        t
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn font(&self) -> &dyn Font {
        &*self.font
    }

    pub fn set_font(&mut self, font: Rc<dyn Font>) {
        self.font = font;
        self.remeasure();
    }

    /// Replaces the string, re-measures it and re-centers when auto-centering.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.remeasure();
    }

    /// Keeps the text centered in `container` on every [`Text::set_text`].
    pub fn set_auto_center(&mut self, axis: Axis, container: Vec2) {
        self.auto_center = Some((axis, container));
        self.center(axis, container);
    }

    pub fn clear_auto_center(&mut self) {
        self.auto_center = None;
    }

    pub fn center(&mut self, axis: Axis, container: Vec2) {
        if axis.has_x() {
            self.pos.x = container.x / 2.0 - self.font.measure_width(&self.text, self.scale) / 2.0;
        }
        if axis.has_y() {
            self.pos.y = container.y / 2.0 - self.font.measure_height(&self.text, self.scale) / 2.0;
        }
    }

    fn remeasure(&mut self) {
        self.size = Vec2::new(
            self.font.measure_width(&self.text, self.scale),
            self.font.measure_height(&self.text, self.scale),
        );
        if let Some((axis, container)) = self.auto_center {
            self.center(axis, container);
        }
    }

    // ── tweens ────────────────────────────────────────────────────────────

    pub fn tween_position(&mut self, to: Vec2, duration: f32, ease: Ease, delay: f32) {
        self.pos_tween
            .set(Tween::new(self.pos, to, duration, ease).with_delay(delay));
    }

    pub fn tween_scale(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.scale_tween
            .set(Tween::new(self.scale, to, duration, ease).with_delay(delay));
    }

    pub fn tween_rotation(&mut self, to: f32, duration: f32, ease: Ease, delay: f32) {
        self.rotation_tween
            .set(Tween::new(self.rotation, to, duration, ease).with_delay(delay));
    }

    pub fn tween_color(&mut self, to: Color, duration: f32, ease: Ease, delay: f32) {
        self.color_tween
            .set(Tween::new(self.color, to, duration, ease).with_delay(delay));
    }

    pub fn cancel_position(&mut self) {
        self.pos_tween.cancel();
    }

    pub fn cancel_scale(&mut self) {
        self.scale_tween.cancel();
    }

    pub fn cancel_rotation(&mut self) {
        self.rotation_tween.cancel();
    }

    pub fn cancel_color(&mut self) {
        self.color_tween.cancel();
    }
}

impl Drawable for Text {
    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn update(&mut self, dt: f32) {
        self.pos_tween.step(dt, &mut self.pos);
        self.scale_tween.step(dt, &mut self.scale);
        self.rotation_tween.step(dt, &mut self.rotation);
        self.color_tween.step(dt, &mut self.color);
    }

    fn kind(&self) -> DrawableKind<'_> {
        DrawableKind::Text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::FixedFont;

    fn font() -> Rc<dyn Font> {
        Rc::new(FixedFont::new("abcd", Vec2::new(8.0, 12.0), 10.0))
    }

    #[test]
    fn set_text_measures() {
        let mut t = Text::new(font(), "ab");
        assert_eq!(t.size, Vec2::new(20.0, 12.0));
        t.set_text("abcd");
        assert_eq!(t.size, Vec2::new(40.0, 12.0));
    }

    #[test]
    fn auto_center_follows_text() {
        let mut t = Text::new(font(), "ab");
        t.set_auto_center(Axis::Both, Vec2::new(100.0, 50.0));
        assert_eq!(t.pos, Vec2::new(40.0, 19.0));

        t.set_text("abcd");
        assert_eq!(t.pos.x, 30.0);

        t.clear_auto_center();
        t.set_text("a");
        assert_eq!(t.pos.x, 30.0);
    }

    #[test]
    fn tweens_step_on_update() {
        let mut t = Text::new(font(), "a");
        t.tween_scale(3.0, 2.0, Ease::Linear, 0.0);
        t.tween_color(Color::BLACK, 1.0, Ease::Linear, 1.0);
        t.update(1.0);
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.color, Color::WHITE);
        t.update(1.0);
        assert_eq!(t.scale, 3.0);
        assert_eq!(t.color, Color::BLACK);
    }

    #[test]
    fn cancel_position_keeps_current() {
        let mut t = Text::new(font(), "a");
        t.tween_position(Vec2::new(10.0, 0.0), 1.0, Ease::Linear, 0.0);
        t.update(0.5);
        t.cancel_position();
        t.update(0.5);
        assert_eq!(t.pos, Vec2::new(5.0, 0.0));
    }
}
