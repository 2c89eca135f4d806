use super::Vec2;

/// Region of the window the game image is presented in, in physical pixels.
///
/// The window keeps the design aspect ratio of its initial size; the viewport
/// is the largest centered rectangle with that aspect that fits the window.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Viewport {
    #[inline]
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub const fn from_size(size: Vec2) -> Self {
        Self { pos: Vec2::ZERO, size }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0 && self.pos.is_finite() && self.size.is_finite()
    }

    /// Computes the letterbox viewport for a `width` x `height` window whose
    /// design size is `initial`.
    ///
    /// Sizes and offsets are truncated to whole pixels.
    pub fn letterbox(initial: Vec2, width: u32, height: u32) -> Self {
        if initial.x <= 0.0 || initial.y <= 0.0 {
            return Self::from_size(Vec2::new(width as f32, height as f32));
        }

        let (w, h) = (width as f32, height as f32);
        let ratio = (w / initial.x).min(h / initial.y);

        let view_w = (initial.x * ratio) as i32;
        let view_h = (initial.y * ratio) as i32;
        let view_x = ((w - initial.x * ratio) as i32) / 2;
        let view_y = ((h - initial.y * ratio) as i32) / 2;

        Self {
            pos: Vec2::new(view_x as f32, view_y as f32),
            size: Vec2::new(view_w as f32, view_h as f32),
        }
    }
}
