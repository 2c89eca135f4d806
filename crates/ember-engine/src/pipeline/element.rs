use std::any::Any;
use std::collections::HashSet;
use std::fmt;

use crate::camera::{Camera, CameraId};
use crate::coords::{Vec2, Viewport};
use crate::error::GfxResult;
use crate::render::{GraphicsContext, TextureId};

/// Type tag of a pipeline stage, used for lookup by kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    CameraRenderer = 0x01,
    WindowRenderer = 0x02,
    Crt = 0x10,
    Chromatic = 0x11,
    SpeedLines = 0x12,
    CustomShader = 0x13,
}

impl ElementKind {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::CameraRenderer => "camera renderer",
            ElementKind::WindowRenderer => "window renderer",
            ElementKind::Crt => "crt",
            ElementKind::Chromatic => "chromatic",
            ElementKind::SpeedLines => "speed lines",
            ElementKind::CustomShader => "custom shader",
        };
        f.write_str(name)
    }
}

/// What a stage knows about the window it renders for.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WindowInfo {
    /// Design size; world coordinates map onto this.
    pub initial_size: Vec2,
    /// Letterboxed region of the surface, in physical pixels.
    pub viewport: Viewport,
}

impl WindowInfo {
    /// Window still at its design size.
    pub fn new(initial_size: Vec2) -> Self {
        Self {
            initial_size,
            viewport: Viewport::from_size(initial_size),
        }
    }
}

/// Token handed from one stage to the next.
#[derive(Debug, Copy, Clone, Default)]
pub struct PipelineData<'a> {
    /// Camera this pass renders.
    pub camera: Option<&'a Camera>,
    /// Output of the previous stage.
    pub texture: Option<TextureId>,
    pub window: WindowInfo,
}

impl<'a> PipelineData<'a> {
    pub fn new(camera: &'a Camera, window: WindowInfo) -> Self {
        Self {
            camera: Some(camera),
            texture: None,
            window,
        }
    }

    /// Same token carrying `texture` as the stage output.
    #[inline]
    pub fn with_texture(self, texture: Option<TextureId>) -> Self {
        Self { texture, ..self }
    }
}

impl PartialEq for PipelineData<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.camera.map(Camera::id) == other.camera.map(Camera::id)
            && self.texture == other.texture
            && self.window == other.window
    }
}

/// State every stage carries: its viewport and the cameras it skips.
#[derive(Debug, Default)]
pub struct ElementBase {
    pub viewport: Viewport,
    excluded: HashSet<CameraId>,
}

/// One stage of a [`crate::pipeline::RenderPipeline`].
///
/// `construct` is called once when the stage is added; `on_resize` whenever
/// the window viewport changes; `release` frees every GPU resource. A stage
/// that was never constructed passes the incoming token through unchanged.
pub trait PipelineElement: Any {
    fn kind(&self) -> ElementKind;

    fn base(&self) -> &ElementBase;
    fn base_mut(&mut self) -> &mut ElementBase;

    fn construct(&mut self, gfx: &mut dyn GraphicsContext, window: &WindowInfo) -> GfxResult<()>;

    fn downstream<'a>(&mut self, gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a>;

    fn on_resize(&mut self, _gfx: &mut dyn GraphicsContext, _window: &WindowInfo) -> GfxResult<()> {
        Ok(())
    }

    fn release(&mut self, gfx: &mut dyn GraphicsContext);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    // ── provided ──────────────────────────────────────────────────────────

    fn add_excluded_camera(&mut self, camera: CameraId) {
        self.base_mut().excluded.insert(camera);
    }

    fn remove_excluded_camera(&mut self, camera: CameraId) {
        self.base_mut().excluded.remove(&camera);
    }

    fn is_excluded_from(&self, camera: CameraId) -> bool {
        self.base().excluded.contains(&camera)
    }

    fn viewport(&self) -> Viewport {
        self.base().viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.base_mut().viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let kinds = [
            ElementKind::CameraRenderer,
            ElementKind::WindowRenderer,
            ElementKind::Crt,
            ElementKind::Chromatic,
            ElementKind::SpeedLines,
            ElementKind::CustomShader,
        ];
        let tags: HashSet<u8> = kinds.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), kinds.len());
    }

    #[test]
    fn token_equality_uses_camera_identity() {
        let a = Camera::new(Vec2::ONE);
        let b = Camera::new(Vec2::ONE);
        let window = WindowInfo::new(Vec2::ONE);
        assert_eq!(PipelineData::new(&a, window), PipelineData::new(&a, window));
        assert_ne!(PipelineData::new(&a, window), PipelineData::new(&b, window));
    }
}
