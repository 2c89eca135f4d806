use std::fmt;

use crate::camera::Camera;
use crate::error::GfxResult;
use crate::render::GraphicsContext;

use super::{CameraRenderer, ElementKind, PipelineData, PipelineElement, WindowInfo, WindowRenderer};

/// Identity of a stage inside one [`RenderPipeline`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ElementId(u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Ordered chain of stages; registration order is execution order.
pub struct RenderPipeline {
    elements: Vec<(ElementId, Box<dyn PipelineElement>)>,
    next_id: u32,
    window: WindowInfo,
}

impl RenderPipeline {
    pub fn new(window: WindowInfo) -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
            window,
        }
    }

    /// `[CameraRenderer, WindowRenderer]`.
    pub fn default_pipeline(gfx: &mut dyn GraphicsContext, window: WindowInfo) -> GfxResult<Self> {
        let mut pipeline = Self::new(window);
        let built = pipeline
            .add_element(gfx, CameraRenderer::new())
            .and_then(|_| pipeline.add_element(gfx, WindowRenderer::new()));
        match built {
            Ok(_) => Ok(pipeline),
            Err(e) => {
                pipeline.release(gfx);
                Err(e)
            }
        }
    }

    #[inline]
    pub fn window(&self) -> WindowInfo {
        self.window
    }

    /// Constructs `element` against the window and appends it.
    pub fn add_element<E: PipelineElement>(&mut self, gfx: &mut dyn GraphicsContext, element: E) -> GfxResult<ElementId> {
        self.add_boxed(gfx, Box::new(element))
    }

    /// Like [`RenderPipeline::add_element`] for an already boxed stage.
    ///
    /// On failure the stage's partial resources are released and it is dropped.
    pub fn add_boxed(&mut self, gfx: &mut dyn GraphicsContext, mut element: Box<dyn PipelineElement>) -> GfxResult<ElementId> {
        let window = self.window;
        element.set_viewport(window.viewport);

        let constructed = element.construct(gfx, &window).and_then(|()| {
            // the window may already differ from its design size
            if window.viewport != WindowInfo::new(window.initial_size).viewport {
                element.on_resize(gfx, &window)
            } else {
                Ok(())
            }
        });

        if let Err(e) = constructed {
            log::error!("pipeline: failed to construct {} stage: {e}", element.kind());
            element.release(gfx);
            return Err(e);
        }

        let id = ElementId(self.next_id);
        self.next_id += 1;
        log::debug!("pipeline: added {} stage as {id}", element.kind());
        self.elements.push((id, element));
        Ok(id)
    }

    /// Detaches a stage without releasing its resources.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Box<dyn PipelineElement>> {
        let index = self.elements.iter().position(|(eid, _)| *eid == id)?;
        Some(self.elements.remove(index).1)
    }

    pub fn element(&self, id: ElementId) -> Option<&dyn PipelineElement> {
        self.elements
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, e)| e.as_ref())
    }

    pub fn element_mut<T: PipelineElement>(&mut self, id: ElementId) -> Option<&mut T> {
        self.elements
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .and_then(|(_, e)| e.as_any_mut().downcast_mut::<T>())
    }

    /// First stage of `kind`, in registration order.
    pub fn element_by_kind(&self, kind: ElementKind) -> Option<(ElementId, &dyn PipelineElement)> {
        self.elements
            .iter()
            .find(|(_, e)| e.kind() == kind)
            .map(|(id, e)| (*id, e.as_ref()))
    }

    pub fn element_by_kind_mut(&mut self, kind: ElementKind) -> Option<&mut dyn PipelineElement> {
        self.elements
            .iter_mut()
            .find(|(_, e)| e.kind() == kind)
            .map(|(_, e)| e.as_mut())
    }

    /// First stage of concrete type `T`.
    pub fn find_mut<T: PipelineElement>(&mut self) -> Option<&mut T> {
        self.elements
            .iter_mut()
            .find_map(|(_, e)| e.as_any_mut().downcast_mut::<T>())
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &dyn PipelineElement)> {
        self.elements.iter().map(|(id, e)| (*id, e.as_ref()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Renders every camera through the chain, in the given order.
    ///
    /// Stages excluding a camera are skipped for it; the token flows on
    /// unchanged.
    pub fn flush(&mut self, gfx: &mut dyn GraphicsContext, cameras: &[&Camera]) {
        let window = self.window;
        for (_, element) in &mut self.elements {
            element.set_viewport(window.viewport);
        }

        for camera in cameras {
            let mut data = PipelineData::new(camera, window);
            for (_, element) in &mut self.elements {
                if element.is_excluded_from(camera.id()) {
                    continue;
                }
                data = element.downstream(gfx, data);
            }
        }
    }

    /// Rebuilds every stage for the new window viewport.
    ///
    /// All stages are visited even if one fails; the first error is returned.
    pub fn handle_resize(&mut self, gfx: &mut dyn GraphicsContext, window: WindowInfo) -> GfxResult<()> {
        self.window = window;
        log::debug!(
            "pipeline: resize to {}x{} at ({}, {})",
            window.viewport.size.x,
            window.viewport.size.y,
            window.viewport.pos.x,
            window.viewport.pos.y
        );

        let mut first_err = None;
        for (_, element) in &mut self.elements {
            element.set_viewport(window.viewport);
            if let Err(e) = element.on_resize(gfx, &window) {
                log::error!("pipeline: {} stage failed to resize: {e}", element.kind());
                first_err.get_or_insert(e);
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Releases every stage's resources and empties the pipeline.
    pub fn release(&mut self, gfx: &mut dyn GraphicsContext) {
        for (_, mut element) in self.elements.drain(..) {
            element.release(gfx);
        }
    }
}

impl fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("stages", &self.elements.iter().map(|(_, e)| e.kind()).collect::<Vec<_>>())
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::camera::CameraId;
    use crate::coords::{Vec2, Viewport};
    use crate::drawable::{shared, Sprite};
    use crate::pipeline::{ChromaticEffect, ChromaticParams, CrtEffect, ElementBase};
    use crate::render::{Command, HeadlessContext, PassTarget, TextureId};

    fn window() -> WindowInfo {
        WindowInfo::new(Vec2::new(320.0, 240.0))
    }

    /// What a recorder saw on one `downstream` call.
    #[derive(Debug, Clone, PartialEq)]
    struct Seen {
        stage: &'static str,
        camera: Option<CameraId>,
        texture: Option<TextureId>,
    }

    /// Stage that records its input and passes it on unchanged.
    struct Recorder {
        base: ElementBase,
        name: &'static str,
        log: Rc<RefCell<Vec<Seen>>>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<Seen>>>) -> Self {
            Self {
                base: ElementBase::default(),
                name,
                log: log.clone(),
            }
        }
    }

    impl PipelineElement for Recorder {
        element_plumbing!();

        fn kind(&self) -> ElementKind {
            ElementKind::CustomShader
        }

        fn construct(&mut self, _gfx: &mut dyn GraphicsContext, _window: &WindowInfo) -> GfxResult<()> {
            Ok(())
        }

        fn downstream<'a>(&mut self, _gfx: &mut dyn GraphicsContext, data: PipelineData<'a>) -> PipelineData<'a> {
            self.log.borrow_mut().push(Seen {
                stage: self.name,
                camera: data.camera.map(Camera::id),
                texture: data.texture,
            });
            data
        }

        fn release(&mut self, _gfx: &mut dyn GraphicsContext) {}
    }

    fn camera_with_sprite() -> Camera {
        let mut cam = Camera::new(window().initial_size);
        cam.add(shared(Sprite::new(Vec2::ZERO, Vec2::new(10.0, 10.0))));
        cam
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn each_stage_runs_once_per_camera_in_order() {
        let mut gfx = HeadlessContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = RenderPipeline::new(window());
        for name in ["a", "b", "c"] {
            pipeline.add_element(&mut gfx, Recorder::new(name, &log)).unwrap();
        }

        let cams = [Camera::new(Vec2::ONE), Camera::new(Vec2::ONE)];
        pipeline.flush(&mut gfx, &[&cams[0], &cams[1]]);

        let order: Vec<_> = log.borrow().iter().map(|s| (s.camera, s.stage)).collect();
        let (c0, c1) = (Some(cams[0].id()), Some(cams[1].id()));
        assert_eq!(
            order,
            vec![(c0, "a"), (c0, "b"), (c0, "c"), (c1, "a"), (c1, "b"), (c1, "c")]
        );
    }

    #[test]
    fn excluded_stage_is_skipped_and_token_flows_unchanged() {
        let mut gfx = HeadlessContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = RenderPipeline::new(window());
        pipeline.add_element(&mut gfx, CameraRenderer::new()).unwrap();
        let crt = pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();
        pipeline.add_element(&mut gfx, Recorder::new("after", &log)).unwrap();

        let excluded = camera_with_sprite();
        let included = camera_with_sprite();
        pipeline
            .element_mut::<CrtEffect>(crt)
            .unwrap()
            .add_excluded_camera(excluded.id());
        gfx.clear_commands();

        pipeline.flush(&mut gfx, &[&excluded, &included]);

        let crt_fb = pipeline
            .element_mut::<CrtEffect>(crt)
            .unwrap()
            .core()
            .framebuffer()
            .unwrap();
        // the CRT pass ran exactly once: for the included camera
        assert_eq!(gfx.draws_into(PassTarget::Framebuffer(crt_fb)).count(), 1);

        let (_, camera_stage) = pipeline.element_by_kind(ElementKind::CameraRenderer).unwrap();
        let camera_out = camera_stage
            .as_any()
            .downcast_ref::<CameraRenderer>()
            .unwrap()
            .core()
            .output(&gfx);
        let crt_out = gfx.framebuffer_texture(crt_fb);

        let seen = log.borrow();
        assert_eq!(seen[0].camera, Some(excluded.id()));
        assert_eq!(seen[0].texture, camera_out);
        assert_eq!(seen[1].camera, Some(included.id()));
        assert_eq!(seen[1].texture, crt_out);
    }

    #[test]
    fn removing_an_exclusion_restores_the_stage() {
        let mut gfx = HeadlessContext::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = RenderPipeline::new(window());
        let id = pipeline.add_element(&mut gfx, Recorder::new("p", &log)).unwrap();
        let cam = Camera::new(Vec2::ONE);

        let recorder = pipeline.element_mut::<Recorder>(id).unwrap();
        recorder.add_excluded_camera(cam.id());
        assert!(recorder.is_excluded_from(cam.id()));
        pipeline.flush(&mut gfx, &[&cam]);
        assert!(log.borrow().is_empty());

        pipeline.element_mut::<Recorder>(id).unwrap().remove_excluded_camera(cam.id());
        pipeline.flush(&mut gfx, &[&cam]);
        assert_eq!(log.borrow().len(), 1);
    }

    // ── chromatic scenario ────────────────────────────────────────────────

    #[test]
    fn camera_chromatic_window_chain() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        let cam_id = pipeline.add_element(&mut gfx, CameraRenderer::new()).unwrap();
        let fx_id = pipeline
            .add_element(&mut gfx, ChromaticEffect::new(ChromaticParams { strength: 0.5 }))
            .unwrap();
        pipeline.add_element(&mut gfx, WindowRenderer::new()).unwrap();
        gfx.clear_commands();

        let cam = camera_with_sprite();
        pipeline.flush(&mut gfx, &[&cam]);

        let camera_fb = pipeline.element_mut::<CameraRenderer>(cam_id).unwrap().core().framebuffer().unwrap();
        let fx_fb = pipeline.element_mut::<ChromaticEffect>(fx_id).unwrap().core().framebuffer().unwrap();
        let camera_tex = gfx.framebuffer_texture(camera_fb).unwrap();
        let fx_tex = gfx.framebuffer_texture(fx_fb).unwrap();
        assert_ne!(camera_tex, fx_tex);

        let draws: Vec<_> = gfx.draws().collect();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].target, PassTarget::Framebuffer(camera_fb));
        assert_eq!(draws[1].target, PassTarget::Framebuffer(fx_fb));
        assert_eq!(draws[1].call.texture, Some(camera_tex));
        assert!(matches!(draws[2].target, PassTarget::Screen { .. }));
        assert_eq!(draws[2].call.texture, Some(fx_tex));
    }

    // ── lookup / removal ──────────────────────────────────────────────────

    #[test]
    fn lookup_by_kind_returns_first_match() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        let first = pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();
        pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();

        assert_eq!(pipeline.element_by_kind(ElementKind::Crt).map(|(id, _)| id), Some(first));
        assert!(pipeline.element_by_kind(ElementKind::SpeedLines).is_none());
    }

    #[test]
    fn remove_detaches_without_release() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        let id = pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();

        let mut stage = pipeline.remove_element(id).unwrap();
        assert!(pipeline.is_empty());
        assert!(pipeline.remove_element(id).is_none());
        assert_eq!(gfx.live_framebuffers(), 1);

        stage.release(&mut gfx);
        assert_eq!(gfx.live_framebuffers(), 0);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_rebuilds_every_framebuffer_at_notified_size() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        let cam_id = pipeline.add_element(&mut gfx, CameraRenderer::new()).unwrap();
        let fx_id = pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();
        let win_id = pipeline.add_element(&mut gfx, WindowRenderer::new()).unwrap();

        let viewport = Viewport::letterbox(window().initial_size, 1000, 600);
        let resized = WindowInfo { viewport, ..window() };
        pipeline.handle_resize(&mut gfx, resized).unwrap();

        let expected = Some((viewport.size.x as u32, viewport.size.y as u32));
        let cam_fb = pipeline.element_mut::<CameraRenderer>(cam_id).unwrap().core().framebuffer().unwrap();
        let fx_fb = pipeline.element_mut::<CrtEffect>(fx_id).unwrap().core().framebuffer().unwrap();
        assert_eq!(gfx.framebuffer_size(cam_fb), expected);
        assert_eq!(gfx.framebuffer_size(fx_fb), expected);
        assert_eq!(gfx.live_framebuffers(), 2);
        assert_eq!(pipeline.element(win_id).unwrap().viewport(), viewport);
    }

    #[test]
    fn stage_added_after_resize_matches_current_viewport() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        let viewport = Viewport::letterbox(window().initial_size, 640, 480);
        pipeline
            .handle_resize(&mut gfx, WindowInfo { viewport, ..window() })
            .unwrap();

        let id = pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();
        let fb = pipeline.element_mut::<CrtEffect>(id).unwrap().core().framebuffer().unwrap();
        assert_eq!(gfx.framebuffer_size(fb), Some((640, 480)));
    }

    #[test]
    fn resize_failure_is_reported() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::new(window());
        pipeline.add_element(&mut gfx, CrtEffect::new()).unwrap();

        gfx.fail_framebuffers(true);
        let err = pipeline.handle_resize(&mut gfx, window()).unwrap_err();
        assert_eq!(err.code(), 0x41);
    }

    // ── construction and teardown ─────────────────────────────────────────

    #[test]
    fn failed_construction_releases_partial_resources() {
        let mut gfx = HeadlessContext::new();
        gfx.fail_shader("ember text");
        let mut pipeline = RenderPipeline::new(window());

        assert!(pipeline.add_element(&mut gfx, CameraRenderer::new()).is_err());
        assert!(pipeline.is_empty());
        assert_eq!(gfx.live_shaders(), 0);
        assert_eq!(gfx.live_framebuffers(), 0);
        assert_eq!(gfx.live_geometries(), 0);
    }

    #[test]
    fn default_pipeline_and_release() {
        let mut gfx = HeadlessContext::new();
        let mut pipeline = RenderPipeline::default_pipeline(&mut gfx, window()).unwrap();
        let kinds: Vec<_> = pipeline.elements().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, vec![ElementKind::CameraRenderer, ElementKind::WindowRenderer]);

        pipeline.release(&mut gfx);
        assert!(pipeline.is_empty());
        assert_eq!(gfx.live_shaders(), 0);
        assert_eq!(gfx.live_framebuffers(), 0);
    }

    // ── known limitation ──────────────────────────────────────────────────

    #[test]
    fn unconstructed_stage_passes_token_through_silently() {
        // Downstream has no error channel: a stage whose construction never
        // ran produces no output and the previous texture flows on.
        let mut gfx = HeadlessContext::new();
        let mut stage = CrtEffect::new();
        let input = gfx.create_texture(1, 1, &[0; 4]).unwrap();
        let data = PipelineData::default().with_texture(Some(input));

        let out = stage.downstream(&mut gfx, data);

        assert_eq!(out, data);
        assert!(gfx.commands().iter().all(|c| !matches!(c, Command::Draw(_))));
    }

    #[test]
    fn placeholder_token_yields_fresh_textures() {
        let mut gfx = HeadlessContext::new();
        let placeholder = gfx.create_texture(1, 1, &[0; 4]).unwrap();
        let stages: Vec<Box<dyn PipelineElement>> = vec![
            Box::new(CameraRenderer::new()),
            Box::new(CrtEffect::new()),
            Box::new(ChromaticEffect::new(ChromaticParams::default())),
            Box::new(crate::pipeline::SpeedLinesEffect::default()),
            Box::new(crate::pipeline::CustomShaderEffect::new(crate::pipeline::CustomShaderParams::new(
                "invert",
                "@fragment fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> { \
                 let c = textureSample(t_main, s_main, in.uv); return vec4<f32>(1.0 - c.rgb, c.a); }",
            ))),
        ];

        for mut stage in stages {
            stage.construct(&mut gfx, &window()).unwrap();
            let out = stage.downstream(&mut gfx, PipelineData::default().with_texture(Some(placeholder)));
            assert!(out.texture.is_some(), "{} produced no texture", stage.kind());
            assert_ne!(out.texture, Some(placeholder));
            stage.release(&mut gfx);
        }

        let mut terminal = WindowRenderer::new();
        terminal.construct(&mut gfx, &window()).unwrap();
        let out = terminal.downstream(&mut gfx, PipelineData::default().with_texture(Some(placeholder)));
        assert_eq!(out.texture, None);
    }
}
