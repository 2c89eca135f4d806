use crate::coords::Vec2;
use crate::error::GfxResult;
use crate::render::{GraphicsContext, TextureId};

use super::{Drawable, DrawableKind};

/// Quad showing the most recently pushed video frame.
///
/// Decoding happens elsewhere; the player only owns the frame texture.
#[derive(Debug, Clone)]
pub struct VideoPlayer {
    pub pos: Vec2,
    pub size: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub visible: bool,
    frame: Option<TextureId>,
}

impl Default for VideoPlayer {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            visible: true,
            frame: None,
        }
    }
}

impl VideoPlayer {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            ..Self::default()
        }
    }

    #[inline]
    pub fn frame(&self) -> Option<TextureId> {
        self.frame
    }

    /// Uploads a decoded RGBA frame, reusing the frame texture.
    pub fn push_frame(&mut self, gfx: &mut dyn GraphicsContext, width: u32, height: u32, rgba: &[u8]) -> GfxResult<()> {
        match self.frame {
            Some(texture) => gfx.update_texture(texture, width, height, rgba)?,
            None => self.frame = Some(gfx.create_texture(width, height, rgba)?),
        }
        Ok(())
    }

    pub fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        if let Some(texture) = self.frame.take() {
            gfx.destroy_texture(texture);
        }
    }
}

impl Drawable for VideoPlayer {
    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn kind(&self) -> DrawableKind<'_> {
        DrawableKind::Video(self)
    }
}
