//! Glyph fonts consumed by [`crate::drawable::Text`].
//!
//! The renderer only needs per-glyph metrics and a texture; how the glyphs
//! were produced is up to the [`Font`] implementation.

mod glyph_font;

pub use glyph_font::GlyphFont;

use crate::coords::Vec2;
use crate::render::TextureId;

/// One rasterized glyph, in pixels at scale 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// `None` for glyphs without coverage (e.g. space).
    pub texture: Option<TextureId>,
    pub size: Vec2,
    /// Offset from the pen position: `x` to the left edge, `y` from the
    /// baseline up to the top edge.
    pub bearing: Vec2,
    /// Horizontal pen advance.
    pub advance: f32,
}

pub trait Font {
    fn glyph(&self, c: char) -> Option<&Glyph>;

    /// Sum of the advances of every known glyph in `text`.
    fn measure_width(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.advance * scale)
            .sum()
    }

    /// Height of the tallest known glyph in `text`.
    fn measure_height(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.size.y * scale)
            .fold(0.0, f32::max)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedFont;
    use super::*;

    #[test]
    fn measure_skips_unknown_glyphs() {
        let font = FixedFont::new("ab", Vec2::new(8.0, 10.0), 9.0);
        assert_eq!(font.measure_width("ab?", 2.0), 36.0);
        assert_eq!(font.measure_height("ab?", 2.0), 20.0);
        assert_eq!(font.measure_width("", 1.0), 0.0);
    }
}
