use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;

use ember_engine::anim::Ease;
use ember_engine::coords::{Axis, Color, Vec2};
use ember_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use ember_engine::device::GpuConfig;
use ember_engine::drawable::{shared, Sprite, Text};
use ember_engine::event::{Event, Key};
use ember_engine::logging::{init_logging, LoggingConfig};
use ember_engine::pipeline::{
    ChromaticEffect, ChromaticParams, Effect, PostProcessing, SpeedLinesParams,
};
use ember_engine::render::GraphicsContext;
use ember_engine::text::GlyphFont;
use ember_engine::window::{GameWindow, Runtime, RuntimeConfig};

const DESIGN: Vec2 = Vec2::new(1280.0, 720.0);

/// Effect stacks selectable with the number keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Preset {
    Plain,
    Chromatic,
    Crt,
    Speed,
}

impl Preset {
    fn effects(self) -> Vec<Effect> {
        match self {
            Preset::Plain => Vec::new(),
            Preset::Chromatic => vec![Effect::Chromatic(ChromaticParams { strength: 0.004 })],
            Preset::Crt => vec![
                Effect::Chromatic(ChromaticParams { strength: 0.002 }),
                Effect::Crt,
            ],
            Preset::Speed => vec![Effect::SpeedLines(SpeedLinesParams::default())],
        }
    }
}

#[derive(Default)]
struct Demo {
    pending: Option<Preset>,
    active: Option<Preset>,
    sprite: Option<Rc<RefCell<Sprite>>>,
    elapsed: f32,
}

impl Demo {
    fn apply_preset(&mut self, window: &mut GameWindow, gfx: &mut dyn GraphicsContext, preset: Preset) {
        if self.active == Some(preset) {
            return;
        }

        let builder = preset
            .effects()
            .into_iter()
            .fold(PostProcessing::builder(), |b, e| b.add_effect(e));

        match builder.build(gfx, window.info()).and_then(|p| window.set_pipeline(gfx, p)) {
            Ok(()) => {
                log::info!("switched to {preset:?}");
                self.active = Some(preset);
            }
            Err(e) => log::error!("failed to switch to {preset:?}: {e}"),
        }
    }
}

/// 8x8 two-tone checkerboard.
fn checker_pixels() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(8 * 8 * 4);
    for y in 0..8 {
        for x in 0..8 {
            let v = if (x + y) % 2 == 0 { 235 } else { 60 };
            pixels.extend_from_slice(&[v, v / 2, 255 - v / 2, 255]);
        }
    }
    pixels
}

impl App for Demo {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> anyhow::Result<()> {
        let texture = ctx
            .gfx
            .create_texture(8, 8, &checker_pixels())
            .context("failed to upload checker texture")?;

        let mut sprite = Sprite::new(Vec2::ZERO, Vec2::ZERO);
        sprite.set_texture(texture, 8, 8);
        sprite.size = Vec2::splat(192.0);
        sprite.center(Axis::Both, DESIGN);
        sprite.tween_rotation(360.0, 4.0, Ease::InOutCubic, 0.5);
        let sprite = shared(sprite);

        let camera = ctx
            .window
            .default_camera_mut()
            .context("window has no default camera")?;
        camera.add(sprite.clone());
        camera.tween_zoom(1.25, 2.0, Ease::OutBack, 1.0);
        self.sprite = Some(sprite);

        // a font is optional; the demo still runs without one
        match std::env::var("EMBER_FONT") {
            Ok(path) => {
                let font = GlyphFont::from_file(ctx.gfx, &path, 48.0)
                    .with_context(|| format!("failed to load font '{path}'"))?;
                let mut title = Text::new(Rc::new(font), "ember");
                title.pos.y = 80.0;
                title.set_auto_center(Axis::X, DESIGN);
                title.color = Color::new(1.0, 1.0, 1.0, 0.0);
                title.tween_color(Color::WHITE, 1.5, Ease::OutQuad, 0.25);
                ctx.window.static_camera_mut().add(shared(title));
            }
            Err(_) => log::info!("EMBER_FONT not set, skipping text"),
        }

        self.apply_preset(ctx.window, ctx.gfx, Preset::Chromatic);
        Ok(())
    }

    fn on_event(&mut self, _window: &mut GameWindow, event: &Event) -> AppControl {
        match event {
            Event::KeyPress(Key::Escape) => return AppControl::Exit,
            Event::KeyPress(Key::Digit1) => self.pending = Some(Preset::Plain),
            Event::KeyPress(Key::Digit2) => self.pending = Some(Preset::Chromatic),
            Event::KeyPress(Key::Digit3) => self.pending = Some(Preset::Crt),
            Event::KeyPress(Key::Digit4) => self.pending = Some(Preset::Speed),
            Event::KeyPress(Key::Space) => {
                if let Some(sprite) = &self.sprite {
                    let mut sprite = sprite.borrow_mut();
                    let to = if sprite.scale.x > 1.0 { 1.0 } else { 1.5 };
                    sprite.tween_scale(Vec2::splat(to), 0.4, Ease::OutElastic, 0.0);
                }
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if let Some(preset) = self.pending.take() {
            self.apply_preset(ctx.window, ctx.gfx, preset);
        }

        self.elapsed += ctx.dt();
        if let Some(pipeline) = ctx.window.pipeline_mut() {
            if let Some(chromatic) = pipeline.find_mut::<ChromaticEffect>() {
                let base = if self.active == Some(Preset::Crt) { 0.002 } else { 0.004 };
                chromatic.set_strength(base * (1.0 + (self.elapsed * 2.0).sin() * 0.5));
            }
        }

        AppControl::Continue
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "ember demo".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuConfig::default(), Demo::default())
}
