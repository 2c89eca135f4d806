use std::collections::HashMap;

use crate::coords::Vec2;
use crate::render::TextureId;

/// One frame of a sprite animation.
///
/// `uv_pos`/`uv_size` select the sub-rectangle of `texture`; the sprite's
/// size becomes `uv_size` times `texture_size`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationFrame {
    pub texture: TextureId,
    /// Pixel size of `texture`.
    pub texture_size: (u32, u32),
    pub uv_pos: Vec2,
    pub uv_size: Vec2,
    pub rotation: f32,
    pub offset: Vec2,
}

impl AnimationFrame {
    /// Whole-texture frame.
    pub fn new(texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            texture,
            texture_size: (width, height),
            uv_pos: Vec2::ZERO,
            uv_size: Vec2::ONE,
            rotation: 0.0,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_uv(mut self, pos: Vec2, size: Vec2) -> Self {
        self.uv_pos = pos;
        self.uv_size = size;
        self
    }

    /// Frame `index` of a horizontal strip of `count` equal cells.
    pub fn strip(texture: TextureId, width: u32, height: u32, index: u32, count: u32) -> Self {
        let cell = 1.0 / count.max(1) as f32;
        Self::new(texture, width, height).with_uv(Vec2::new(index as f32 * cell, 0.0), Vec2::new(cell, 1.0))
    }

    pub(crate) fn pixel_size(&self) -> Vec2 {
        let (w, h) = self.texture_size;
        self.uv_size.mul_elem(Vec2::new(w as f32, h as f32))
    }
}

/// Frames shown for `frame_duration` seconds each.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnimation {
    pub frames: Vec<AnimationFrame>,
    pub frame_duration: f32,
    pub looping: bool,
}

impl FrameAnimation {
    pub fn new(frames: Vec<AnimationFrame>, frame_duration: f32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration,
            looping,
        }
    }

    /// Total length of one pass in seconds.
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_duration.max(0.0)
    }
}

/// Named frame animations and the one currently playing.
///
/// A finished non-looping animation hands over to the default animation,
/// or holds its last frame when there is none.
#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    animations: HashMap<String, FrameAnimation>,
    default: Option<String>,
    current: Option<String>,
    frame: usize,
    elapsed: f32,
    /// Current frame not yet handed out.
    dirty: bool,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `animation` under `name`, replacing any previous one.
    pub fn add(&mut self, name: impl Into<String>, animation: FrameAnimation) {
        let name = name.into();
        if self.current.as_deref() == Some(name.as_str()) {
            self.restart(name.clone());
        }
        self.animations.insert(name, animation);
    }

    pub fn add_all<I, S>(&mut self, animations: I)
    where
        I: IntoIterator<Item = (S, FrameAnimation)>,
        S: Into<String>,
    {
        for (name, animation) in animations {
            self.add(name, animation);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FrameAnimation> {
        self.animations.get(name)
    }

    /// Starts `name` from its first frame. Unknown names are ignored.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            log::warn!("sprite animation '{name}' not found");
            return false;
        }
        self.restart(name.to_string());
        true
    }

    /// Animation shown when nothing plays or a one-shot animation ends.
    pub fn set_default(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            log::warn!("sprite animation '{name}' not found");
            return false;
        }
        self.default = Some(name.to_string());
        if self.current.is_none() {
            self.restart(name.to_string());
        }
        true
    }

    pub fn current(&self) -> Option<&FrameAnimation> {
        self.current.as_deref().and_then(|name| self.animations.get(name))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Advances by `dt` seconds. Returns the frame to apply when it changed.
    pub fn update(&mut self, dt: f32) -> Option<AnimationFrame> {
        let animation = self.current()?.clone();
        if animation.frames.is_empty() {
            return None;
        }

        if animation.frame_duration > 0.0 {
            self.elapsed += dt;
            while self.elapsed >= animation.frame_duration {
                self.elapsed -= animation.frame_duration;
                if self.frame + 1 < animation.frames.len() {
                    self.frame += 1;
                    self.dirty = true;
                } else if animation.looping {
                    self.frame = 0;
                    self.dirty = true;
                } else {
                    return self.finish();
                }
            }
        }

        self.take_frame()
    }

    fn finish(&mut self) -> Option<AnimationFrame> {
        match self.default.clone() {
            Some(name) if self.current.as_deref() != Some(name.as_str()) => {
                self.restart(name);
            }
            _ => self.elapsed = 0.0,
        }
        self.take_frame()
    }

    fn restart(&mut self, name: String) {
        self.current = Some(name);
        self.frame = 0;
        self.elapsed = 0.0;
        self.dirty = true;
    }

    fn take_frame(&mut self) -> Option<AnimationFrame> {
        if !std::mem::take(&mut self.dirty) {
            return None;
        }
        self.current().and_then(|a| a.frames.get(self.frame)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{GraphicsContext, HeadlessContext};

    fn frames(gfx: &mut HeadlessContext, count: u32) -> Vec<AnimationFrame> {
        let tex = gfx.create_texture(64, 16, &vec![0; 64 * 16 * 4]).unwrap();
        (0..count).map(|i| AnimationFrame::strip(tex, 64, 16, i, count)).collect()
    }

    #[test]
    fn strip_frame_size() {
        let mut gfx = HeadlessContext::new();
        let f = frames(&mut gfx, 4)[2];
        assert_eq!(f.uv_pos, Vec2::new(0.5, 0.0));
        assert_eq!(f.pixel_size(), Vec2::new(16.0, 16.0));
    }

    #[test]
    fn first_update_emits_first_frame() {
        let mut gfx = HeadlessContext::new();
        let mut player = AnimationPlayer::new();
        player.add("walk", FrameAnimation::new(frames(&mut gfx, 3), 0.1, true));
        assert!(player.play("walk"));
        let f = player.update(0.0).unwrap();
        assert_eq!(f.uv_pos, Vec2::ZERO);
        assert_eq!(player.update(0.05), None);
    }

    #[test]
    fn advances_at_frame_boundary() {
        let mut gfx = HeadlessContext::new();
        let mut player = AnimationPlayer::new();
        player.add("walk", FrameAnimation::new(frames(&mut gfx, 3), 0.25, true));
        player.play("walk");
        player.update(0.0);

        assert_eq!(player.update(0.125), None);
        assert_eq!(player.frame_index(), 0);
        assert!(player.update(0.125).is_some());
        assert_eq!(player.frame_index(), 1);

        // wraps when looping
        player.update(0.5);
        assert_eq!(player.frame_index(), 0);
    }

    #[test]
    fn one_shot_falls_back_to_default() {
        let mut gfx = HeadlessContext::new();
        let mut player = AnimationPlayer::new();
        player.add("idle", FrameAnimation::new(frames(&mut gfx, 2), 0.5, true));
        player.add("jump", FrameAnimation::new(frames(&mut gfx, 2), 0.25, false));

        assert!(player.set_default("idle"));
        assert_eq!(player.current_name(), Some("idle"));

        player.play("jump");
        player.update(0.0);
        player.update(0.25);
        assert_eq!(player.current_name(), Some("jump"));
        assert_eq!(player.frame_index(), 1);

        assert!(player.update(0.25).is_some());
        assert_eq!(player.current_name(), Some("idle"));
        assert_eq!(player.frame_index(), 0);
    }

    #[test]
    fn one_shot_without_default_holds_last_frame() {
        let mut gfx = HeadlessContext::new();
        let mut player = AnimationPlayer::new();
        player.add("jump", FrameAnimation::new(frames(&mut gfx, 2), 0.25, false));
        player.play("jump");
        player.update(0.0);
        player.update(1.0);
        assert_eq!(player.current_name(), Some("jump"));
        assert_eq!(player.frame_index(), 1);
        assert_eq!(player.update(1.0), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut player = AnimationPlayer::new();
        assert!(!player.play("missing"));
        assert!(!player.set_default("missing"));
        assert!(player.current().is_none());
        assert_eq!(player.update(1.0), None);
    }

    #[test]
    fn zero_duration_holds_first_frame() {
        let mut gfx = HeadlessContext::new();
        let mut player = AnimationPlayer::new();
        player.add("still", FrameAnimation::new(frames(&mut gfx, 3), 0.0, true));
        player.play("still");
        assert!(player.update(10.0).is_some());
        assert_eq!(player.frame_index(), 0);
    }
}
