use crate::camera::{Camera, Camera3D, CameraId};
use crate::coords::{Color, Vec2, Viewport};
use crate::error::GfxResult;
use crate::event::{Event, EventManager};
use crate::pipeline::{RenderPipeline, WindowInfo};
use crate::render::{GraphicsContext, PassTarget};

/// A game window: design size, letterbox viewport, cameras, render pipeline
/// and event subscribers.
///
/// Resize notifications rebuild the pipeline's framebuffers before any
/// subscriber sees them, so the next [`GameWindow::draw`] observes a
/// consistent post-resize state.
#[derive(Debug)]
pub struct GameWindow {
    info: WindowInfo,
    surface_size: Vec2,
    pipeline: Option<RenderPipeline>,
    cameras: Vec<Camera>,
    static_camera: Camera,
    camera3d: Option<Camera3D>,
    events: EventManager,
}

impl GameWindow {
    /// Window with one default camera and no pipeline; install one with
    /// [`GameWindow::set_pipeline`] or [`GameWindow::init_default_pipeline`].
    pub fn new(initial_size: Vec2) -> Self {
        Self {
            info: WindowInfo::new(initial_size),
            surface_size: initial_size,
            pipeline: None,
            cameras: vec![Camera::new(initial_size)],
            static_camera: Camera::new(initial_size),
            camera3d: None,
            events: EventManager::new(),
        }
    }

    #[inline]
    pub fn initial_size(&self) -> Vec2 {
        self.info.initial_size
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.info.viewport
    }

    #[inline]
    pub fn info(&self) -> WindowInfo {
        self.info
    }

    // ── cameras ───────────────────────────────────────────────────────────

    /// Appends a camera; cameras are flushed in insertion order.
    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        let id = camera.id();
        self.cameras.push(camera);
        id
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id() == id)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.iter_mut().find(|c| c.id() == id)
    }

    pub fn remove_camera(&mut self, id: CameraId) -> Option<Camera> {
        let index = self.cameras.iter().position(|c| c.id() == id)?;
        Some(self.cameras.remove(index))
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// First camera in flush order; `None` once every camera was removed.
    pub fn default_camera(&self) -> Option<&Camera> {
        self.cameras.first()
    }

    pub fn default_camera_mut(&mut self) -> Option<&mut Camera> {
        self.cameras.first_mut()
    }

    /// Camera drawn after every other camera, typically for HUD elements.
    pub fn static_camera(&self) -> &Camera {
        &self.static_camera
    }

    pub fn static_camera_mut(&mut self) -> &mut Camera {
        &mut self.static_camera
    }

    pub fn set_camera3d(&mut self, camera: Option<Camera3D>) {
        self.camera3d = camera;
    }

    pub fn camera3d(&self) -> Option<&Camera3D> {
        self.camera3d.as_ref()
    }

    pub fn camera3d_mut(&mut self) -> Option<&mut Camera3D> {
        self.camera3d.as_mut()
    }

    // ── pipeline ──────────────────────────────────────────────────────────

    /// Installs `pipeline`, releasing the previous one.
    ///
    /// A pipeline built for a stale viewport is resized to the current one.
    pub fn set_pipeline(&mut self, gfx: &mut dyn GraphicsContext, mut pipeline: RenderPipeline) -> GfxResult<()> {
        if let Some(mut old) = self.pipeline.take() {
            old.release(gfx);
        }

        let result = if pipeline.window() != self.info {
            pipeline.handle_resize(gfx, self.info)
        } else {
            Ok(())
        };

        self.pipeline = Some(pipeline);
        result
    }

    /// Installs `[CameraRenderer, WindowRenderer]`.
    pub fn init_default_pipeline(&mut self, gfx: &mut dyn GraphicsContext) -> GfxResult<()> {
        let pipeline = RenderPipeline::default_pipeline(gfx, self.info)?;
        self.set_pipeline(gfx, pipeline)
    }

    pub fn pipeline(&self) -> Option<&RenderPipeline> {
        self.pipeline.as_ref()
    }

    pub fn pipeline_mut(&mut self) -> Option<&mut RenderPipeline> {
        self.pipeline.as_mut()
    }

    // ── events ────────────────────────────────────────────────────────────

    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    /// Applies a platform event, then notifies subscribers.
    ///
    /// `WindowResize` carries the surface size on input; subscribers receive
    /// the letterboxed viewport instead. A zero-sized surface (minimized) is
    /// ignored.
    pub fn handle_event(&mut self, gfx: &mut dyn GraphicsContext, event: &Event) -> GfxResult<()> {
        match *event {
            Event::WindowResize { width, height, .. } => {
                if width == 0 || height == 0 {
                    log::debug!("window: ignoring resize to {width}x{height}");
                    return Ok(());
                }

                let viewport = Viewport::letterbox(self.info.initial_size, width, height);
                self.info.viewport = viewport;
                self.surface_size = Vec2::new(width as f32, height as f32);

                let rebuilt = match self.pipeline.as_mut() {
                    Some(pipeline) => pipeline.handle_resize(gfx, self.info),
                    None => Ok(()),
                };

                self.events.call_event(&Event::WindowResize {
                    x: viewport.pos.x as i32,
                    y: viewport.pos.y as i32,
                    width: viewport.size.x as u32,
                    height: viewport.size.y as u32,
                });
                rebuilt
            }
            Event::MouseMove { x, y } => {
                if let Some(camera) = self.camera3d.as_mut() {
                    camera.on_mouse_move(x, y);
                }
                self.events.call_event(event);
                Ok(())
            }
            _ => {
                self.events.call_event(event);
                Ok(())
            }
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Advances every camera (and their drawables) by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for camera in &mut self.cameras {
            camera.update(dt);
        }
        self.static_camera.update(dt);
        if let Some(camera) = self.camera3d.as_mut() {
            camera.update(dt);
        }
    }

    /// Clears the surface to black, then renders every camera through the
    /// pipeline with the static camera last.
    pub fn draw(&mut self, gfx: &mut dyn GraphicsContext) {
        gfx.begin_pass(
            PassTarget::Screen {
                viewport: Viewport::from_size(self.surface_size),
            },
            Some(Color::BLACK),
        );
        gfx.end_pass();

        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };

        let cameras: Vec<&Camera> = self
            .cameras
            .iter()
            .chain(std::iter::once(&self.static_camera))
            .collect();
        pipeline.flush(gfx, &cameras);
    }

    /// Releases pipeline resources, then drops every subscriber.
    pub fn shutdown(&mut self, gfx: &mut dyn GraphicsContext) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.release(gfx);
        }
        self.events.clear();
        log::debug!("window: shut down");
    }
}
