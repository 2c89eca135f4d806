use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Vec2;
use crate::core::{App, AppControl, FrameCtx, SetupCtx};
use crate::device::{Gpu, GpuConfig, SurfaceRecovery, WgpuBackend};
use crate::event::platform::translate_window_event;
use crate::event::Event;
use crate::time::FrameClock;

use super::GameWindow;

/// Settings for the game window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Design size; world coordinates and framebuffers start at this size.
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
        }
    }
}

/// Drives a [`GameWindow`] and an [`App`] from the winit event loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu: GpuConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create the event loop")?;
        let mut state = AppState {
            config,
            gpu,
            app,
            active: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("event loop exited with an error")?;

        match state.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that lives while the window is open.
struct Active {
    surface: WindowSurface,
    backend: WgpuBackend,
    game: GameWindow,
    clock: FrameClock,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu: GpuConfig,
    app: A,

    active: Option<Active>,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<Active> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_config = self.gpu.clone();
        let surface = WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_config)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let mut backend = surface.with_gpu(|gpu| gpu.create_backend());
        let design = self.config.initial_size;
        let mut game = GameWindow::new(Vec2::new(design.width as f32, design.height as f32));

        self.app
            .setup(&mut SetupCtx {
                window: &mut game,
                gfx: &mut backend,
            })
            .context("app setup failed")?;

        if game.pipeline().is_none() {
            game.init_default_pipeline(&mut backend)
                .context("failed to build the default render pipeline")?;
        }

        // establish the viewport for the actual surface size
        let size = surface.with_window(|w| w.inner_size());
        let resize = Event::WindowResize {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        };
        if let Err(e) = game.handle_event(&mut backend, &resize) {
            log::error!("initial resize failed: {e}");
        }

        log::info!("window '{}' opened at {}x{}", self.config.title, size.width, size.height);

        Ok(Active {
            surface,
            backend,
            game,
            clock: FrameClock::default(),
        })
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut active) = self.active.take() {
            active.game.shutdown(&mut active.backend);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure.get_or_insert(error);
        self.close(event_loop);
    }

    fn dispatch(&mut self, event: &Event) -> AppControl {
        let Some(active) = self.active.as_mut() else {
            return AppControl::Continue;
        };

        if let Event::WindowResize { width, height, .. } = *event {
            active.surface.with_gpu_mut(|gpu| gpu.resize(width, height));
        }

        if let Err(e) = active.game.handle_event(&mut active.backend, event) {
            log::error!("failed to apply {:?}: {e}", event.kind());
        }

        self.app.on_event(&mut active.game, event)
    }

    fn frame(&mut self) -> AppControl {
        let Some(active) = self.active.as_mut() else {
            return AppControl::Continue;
        };

        let time = active.clock.tick();
        let control = self.app.on_frame(&mut FrameCtx {
            window: &mut active.game,
            gfx: &mut active.backend,
            time,
        });
        if control == AppControl::Exit {
            return control;
        }

        active.game.update(time.dt);

        let mut frame = match active.surface.with_gpu(|gpu| gpu.begin_frame()) {
            Ok(frame) => frame,
            Err(err) => {
                let recovery = active.surface.with_gpu_mut(|gpu| gpu.recover(&err));
                log::debug!("frame acquisition failed ({err}), {recovery:?}");
                return match recovery {
                    SurfaceRecovery::Fatal => AppControl::Exit,
                    SurfaceRecovery::Reconfigured | SurfaceRecovery::Skip => AppControl::Continue,
                };
            }
        };

        let size = active.surface.with_gpu(|gpu| gpu.size());
        active.backend.begin_frame();
        active.game.draw(&mut active.backend);
        active.backend.encode(&mut frame.encoder, &frame.view, size);

        active.surface.with_window(|w| w.pre_present_notify());
        active.surface.with_gpu(|gpu| gpu.present(frame));

        AppControl::Continue
    }

    fn request_redraw(&self) {
        if let Some(active) = self.active.as_ref() {
            active.surface.with_window(|w| w.request_redraw());
        }
    }

    fn window_id(&self) -> Option<WindowId> {
        self.active
            .as_ref()
            .map(|active| active.surface.with_window(|w| w.id()))
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() {
            return;
        }

        match self.open(event_loop) {
            Ok(active) => {
                self.active = Some(active);
                self.request_redraw();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window_id() != Some(window_id) {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.close(event_loop);
                return;
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self
                    .active
                    .as_ref()
                    .map(|active| active.surface.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    let resize = Event::WindowResize {
                        x: 0,
                        y: 0,
                        width: size.width,
                        height: size.height,
                    };
                    if self.dispatch(&resize) == AppControl::Exit {
                        self.close(event_loop);
                    }
                }
                return;
            }

            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.close(event_loop);
                }
                return;
            }

            _ => {}
        }

        if let Some(ev) = translate_window_event(&event) {
            if self.dispatch(&ev) == AppControl::Exit {
                self.close(event_loop);
            }
        }
    }
}
