use std::collections::HashMap;
use std::path::Path;

use crate::coords::Vec2;
use crate::error::{GfxError, GfxResult};
use crate::render::GraphicsContext;

use super::{Font, Glyph};

/// Font rasterized once with `fontdue` into one texture per glyph.
///
/// Covers printable ASCII plus any extra characters passed to
/// [`GlyphFont::with_alphabet`]. Coverage is stored in every channel so the
/// text shader can read it from `r`.
pub struct GlyphFont {
    px: f32,
    glyphs: HashMap<char, Glyph>,
}

impl GlyphFont {
    /// Rasterizes printable ASCII at `px` pixels.
    pub fn from_bytes(gfx: &mut dyn GraphicsContext, bytes: &[u8], px: f32) -> GfxResult<Self> {
        let alphabet: Vec<char> = (' '..='~').collect();
        Self::with_alphabet(gfx, bytes, px, &alphabet)
    }

    pub fn from_file(gfx: &mut dyn GraphicsContext, path: impl AsRef<Path>, px: f32) -> GfxResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| GfxError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(gfx, &bytes, px)
    }

    pub fn with_alphabet(
        gfx: &mut dyn GraphicsContext,
        bytes: &[u8],
        px: f32,
        alphabet: &[char],
    ) -> GfxResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(GfxError::font)?;

        let mut glyphs = HashMap::with_capacity(alphabet.len());
        for &c in alphabet {
            if font.lookup_glyph_index(c) == 0 && c != ' ' {
                log::debug!("font: no glyph for {c:?}");
                continue;
            }

            let (metrics, coverage) = font.rasterize(c, px);

            let texture = if metrics.width > 0 && metrics.height > 0 {
                let rgba: Vec<u8> = coverage.iter().flat_map(|&a| [a, a, a, a]).collect();
                Some(gfx.create_texture(metrics.width as u32, metrics.height as u32, &rgba)?)
            } else {
                None
            };

            glyphs.insert(
                c,
                Glyph {
                    texture,
                    size: Vec2::new(metrics.width as f32, metrics.height as f32),
                    bearing: Vec2::new(
                        metrics.xmin as f32,
                        (metrics.ymin + metrics.height as i32) as f32,
                    ),
                    advance: metrics.advance_width,
                },
            );
        }

        log::debug!("font: rasterized {} glyphs at {px}px", glyphs.len());
        Ok(Self { px, glyphs })
    }

    #[inline]
    pub fn pixel_size(&self) -> f32 {
        self.px
    }

    /// Frees every glyph texture.
    pub fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        for glyph in self.glyphs.values_mut() {
            if let Some(texture) = glyph.texture.take() {
                gfx.destroy_texture(texture);
            }
        }
    }
}

impl Font for GlyphFont {
    fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }
}
