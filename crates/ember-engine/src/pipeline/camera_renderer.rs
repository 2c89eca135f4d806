use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::coords::{Color, Vec2};
use crate::drawable::{DrawableKind, Sprite, Text, VideoPlayer};
use crate::error::GfxResult;
use crate::render::{
    builtin, uniform, DrawCall, GeometryId, GraphicsContext, PassTarget, ShaderId, TextureId,
};

use super::{ElementBase, ElementKind, PipelineData, PipelineElement, RendererCore, WindowInfo};

fn translate(v: Vec2) -> Mat4 {
    Mat4::from_translation(v.extend())
}

fn rotate(degrees: f32) -> Mat4 {
    Mat4::from_rotation_z(degrees.to_radians())
}

fn scale(v: Vec2) -> Mat4 {
    Mat4::from_scale(Vec3::new(v.x, v.y, 1.0))
}

/// Model transform of a sprite seen by `camera`.
///
/// Scale grows the quad around its center; rotation pivots on the scaled
/// center before `offset` is applied.
pub(crate) fn sprite_model(sprite: &Sprite, camera_pos: Vec2) -> Mat4 {
    let pos = sprite.pos - camera_pos.mul_elem(sprite.scroll_factor);
    let scaled = sprite.size.mul_elem(sprite.scale);
    let diff = scaled - sprite.size;
    let half = scaled / 2.0;

    translate(pos - diff / 2.0)
        * translate(half)
        * rotate(sprite.rotation)
        * translate(-half)
        * translate(sprite.offset)
        * scale(scaled)
}

fn video_model(player: &VideoPlayer) -> Mat4 {
    let scaled = player.size.mul_elem(player.scale);
    let diff = scaled - player.size;

    translate(player.pos - diff / 2.0) * rotate(player.rotation) * scale(scaled)
}

/// First stage of every pipeline: renders one camera's drawables offscreen.
///
/// Sprites and video frames use the sprite shader, text uses the text
/// shader; custom drawables draw themselves inside the same pass. The output
/// token carries the framebuffer texture.
#[derive(Debug)]
pub struct CameraRenderer {
    base: ElementBase,
    core: RendererCore,
    text_shader: Option<ShaderId>,
    /// Mirrored quads: x, y, both.
    flipped: [Option<GeometryId>; 3],
}

impl Default for CameraRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRenderer {
    pub fn new() -> Self {
        Self {
            base: ElementBase::default(),
            core: RendererCore::new(builtin::sprite()),
            text_shader: None,
            flipped: [None; 3],
        }
    }

    #[inline]
    pub fn core(&self) -> &RendererCore {
        &self.core
    }

    #[inline]
    pub fn text_shader(&self) -> Option<ShaderId> {
        self.text_shader
    }

    fn quad(&self, flip_x: bool, flip_y: bool) -> Option<GeometryId> {
        match (flip_x, flip_y) {
            (false, false) => self.core.quad(),
            (true, false) => self.flipped[0],
            (false, true) => self.flipped[1],
            (true, true) => self.flipped[2],
        }
    }

    fn sync_text_projection(&self, gfx: &mut dyn GraphicsContext) {
        if let Some(shader) = self.text_shader {
            gfx.set_uniform(shader, uniform::PROJECTION, self.core.projection().into());
        }
    }

    fn draw_sprite(&self, gfx: &mut dyn GraphicsContext, shader: ShaderId, sprite: &Sprite, camera: &Camera) {
        let Some(geometry) = self.quad(sprite.flip_x, sprite.flip_y) else {
            return;
        };

        gfx.set_uniform(shader, uniform::MODEL, sprite_model(sprite, camera.pos).into());
        gfx.set_uniform(shader, uniform::COLOR, sprite.color.into());
        gfx.set_uniform(shader, uniform::UV_OFFSET, sprite.texture_offset.into());
        gfx.set_uniform(shader, uniform::UV_SIZE, sprite.texture_size.into());
        gfx.draw(DrawCall {
            shader,
            geometry,
            texture: sprite.texture,
        });
    }

    fn draw_text(&self, gfx: &mut dyn GraphicsContext, text: &Text, camera: &Camera) {
        let (Some(shader), Some(geometry)) = (self.text_shader, self.core.quad()) else {
            return;
        };

        let font = text.font();
        let origin = text.pos - camera.pos * camera.zoom;
        let mut pen = 0.0;

        for c in text.text().chars() {
            let Some(glyph) = font.glyph(c) else {
                log::warn!("camera renderer: no glyph for {c:?}");
                continue;
            };

            let x = origin.x + pen + glyph.bearing.x * text.scale;
            let y = origin.y - glyph.bearing.y * text.scale;
            let size = glyph.size * text.scale;
            let half = size / 2.0;

            if let Some(texture) = glyph.texture {
                let model = translate(Vec2::new(x, y))
                    * translate(text.offset)
                    * translate(half)
                    * rotate(text.rotation)
                    * translate(-half)
                    * scale(size);

                gfx.set_uniform(shader, uniform::MODEL, model.into());
                gfx.set_uniform(shader, uniform::COLOR, text.color.into());
                gfx.draw(DrawCall {
                    shader,
                    geometry,
                    texture: Some(texture),
                });
            }

            pen += glyph.advance * text.scale;
        }
    }

    fn draw_video(&self, gfx: &mut dyn GraphicsContext, shader: ShaderId, player: &VideoPlayer) {
        let (Some(geometry), Some(frame)) = (self.core.quad(), player.frame()) else {
            return;
        };

        gfx.set_uniform(shader, uniform::MODEL, video_model(player).into());
        gfx.set_uniform(shader, uniform::COLOR, Color::WHITE.into());
        gfx.set_uniform(shader, uniform::UV_OFFSET, Vec2::ZERO.into());
        gfx.set_uniform(shader, uniform::UV_SIZE, Vec2::ONE.into());
        gfx.draw(DrawCall {
            shader,
            geometry,
            texture: Some(frame),
        });
    }

    fn draw_camera(&self, gfx: &mut dyn GraphicsContext, shader: ShaderId, camera: &Camera) {
        let view = camera.calculate_view();
        gfx.set_uniform(shader, uniform::VIEW, view.into());
        if let Some(text_shader) = self.text_shader {
            gfx.set_uniform(text_shader, uniform::VIEW, view.into());
        }

        for drawable in camera.drawables() {
            let Ok(mut drawable) = drawable.try_borrow_mut() else {
                log::warn!("camera renderer: drawable is borrowed elsewhere; skipped");
                continue;
            };
            if !drawable.visible() {
                continue;
            }

            let custom = match drawable.kind() {
                DrawableKind::Sprite(sprite) => {
                    self.draw_sprite(gfx, shader, sprite, camera);
                    false
                }
                DrawableKind::Text(text) => {
                    self.draw_text(gfx, text, camera);
                    false
                }
                DrawableKind::Video(player) => {
                    self.draw_video(gfx, shader, player);
                    false
                }
                DrawableKind::Custom => true,
            };

            if custom {
                drawable.draw(gfx);
            }
        }
    }
}

impl PipelineElement for CameraRenderer {
    element_plumbing!();

    fn kind(&self) -> ElementKind {
        ElementKind::CameraRenderer
    }

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.construct(gfx, window, &builtin::unit_quad(false, false))?;

        self.text_shader = Some(gfx.compile_shader(&builtin::text())?);
        self.sync_text_projection(gfx);

        let mirrored = [(true, false), (false, true), (true, true)];
        for (slot, (x, y)) in self.flipped.iter_mut().zip(mirrored) {
            *slot = Some(gfx.create_geometry("ember flipped quad", &builtin::unit_quad(x, y))?);
        }
        Ok(())
    }

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
        let (Some(shader), Some(fb)) = (self.core.shader(), self.core.framebuffer()) else {
            log::warn!("camera renderer: stage has no resources; input passed through");
            return data;
        };

        gfx.begin_pass(PassTarget::Framebuffer(fb), Some(Color::TRANSPARENT));
        if let Some(camera) = data.camera {
            self.draw_camera(gfx, shader, camera);
        }
        gfx.end_pass();

        let output: Option<TextureId> = gfx.framebuffer_texture(fb);
        data.with_texture(output)
    }

    fn on_resize(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()> {
        self.core.on_resize(gfx, window)?;
        self.sync_text_projection(gfx);
        Ok(())
    }

    fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        for quad in self.flipped.iter_mut().filter_map(Option::take) {
            gfx.destroy_geometry(quad);
        }
        if let Some(shader) = self.text_shader.take() {
            gfx.destroy_shader(shader);
        }
        self.core.release(gfx);
    }
}
