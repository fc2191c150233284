//! Windowed host for the engine.
//!
//! Opens a window, drives [`Engine::tick`] on a fixed cadence, feeds it
//! pointer input and storm events, and presents each frame through
//! [`GpuState`].
//!
//! # Example
//!
//! ```ignore
//! use stormwave::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_config(EngineConfig::default())
//!         .with_size(1280, 720)
//!         .run()
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::canvas::{pixel_scale, Canvas, Framebuffer, GlyphStyle};
use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::engine::{ClickTarget, Engine};
use crate::error::ViewerError;
use crate::export;
use crate::font::GLYPH_ROWS;
use crate::gpu::{FrameOutcome, GpuState};
use crate::input::{Action, Input};
use crate::presets::{self, PerformanceMode};
use crate::sound::SoundHooks;
use crate::storm::StormController;
use crate::time::{Telemetry, Ticker};

const OVERLAY_FONT_SIZE: f32 = 10.0;

/// Builder for the windowed viewer.
pub struct Viewer {
    config: EngineConfig,
    sound: Option<Box<dyn SoundHooks>>,
    size: (u32, u32),
    performance: PerformanceMode,
    title: String,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            sound: None,
            size: (1280, 720),
            performance: PerformanceMode::default(),
            title: "stormwave".to_string(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach sound hooks to the engine.
    pub fn with_sound(mut self, hooks: Box<dyn SoundHooks>) -> Self {
        self.sound = Some(hooks);
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(1), height.max(1));
        self
    }

    /// Bounds for the config and for `R` randomization. `M` cycles it at runtime.
    pub fn with_performance_mode(mut self, mode: PerformanceMode) -> Self {
        self.performance = mode;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run until the window closes.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    initial_size: (u32, u32),
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    engine: Engine,
    framebuffer: Framebuffer,
    storm: StormController,
    input: Input,
    ticker: Ticker,
    telemetry: Telemetry,
    performance: PerformanceMode,
    show_stats: bool,
    rng: SmallRng,
    error: Option<ViewerError>,
    torn_down: bool,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let Viewer {
            mut config,
            sound,
            size,
            performance,
            title,
        } = viewer;
        presets::clamp(performance, &mut config);

        let (width, height) = size;
        let mut engine = Engine::new(width, height, config);
        engine.set_sound(sound);

        let now = Instant::now();
        Self {
            title,
            initial_size: size,
            window: None,
            gpu: None,
            engine,
            framebuffer: Framebuffer::new(width, height),
            storm: StormController::new(),
            input: Input::new(),
            ticker: Ticker::new(now),
            telemetry: Telemetry::new(now),
            performance,
            show_stats: false,
            rng: SmallRng::from_entropy(),
            error: None,
            torn_down: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.engine.resize(width, height);
        self.framebuffer.resize(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(winit::dpi::PhysicalSize::new(width, height));
        }
    }

    fn apply(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        match action {
            Action::Click(position) => {
                self.engine.click(position, ClickTarget::Canvas);
            }
            Action::PointerMove(position) => {
                self.engine.pointer_move(position, Instant::now());
            }
            Action::ToggleRipples => {
                let mut config = self.engine.config().clone();
                config.enable_mouse_ripples = !config.enable_mouse_ripples;
                log::debug!("mouse ripples {}", on_off(config.enable_mouse_ripples));
                self.engine.set_config(config);
            }
            Action::ToggleStats => self.show_stats = !self.show_stats,
            Action::TogglePause => {
                let mut config = self.engine.config().clone();
                config.paused = !config.paused;
                log::debug!("background {}", if config.paused { "paused" } else { "resumed" });
                self.engine.set_config(config);
            }
            Action::Randomize => {
                let mut config = self.engine.config().clone();
                presets::randomize(self.performance, &mut config, &mut self.rng);
                log::debug!(
                    "randomized: {:?} background, {} clicks",
                    config.background_mode,
                    config.click_effect
                );
                self.engine.set_config(config);
            }
            Action::StartStorm => {
                self.storm.start(Instant::now());
            }
            Action::CyclePerformance => {
                self.performance = self.performance.next();
                let mut config = self.engine.config().clone();
                presets::clamp(self.performance, &mut config);
                log::debug!("performance mode {:?}", self.performance);
                self.engine.set_config(config);
            }
            Action::Screenshot => {
                let path = export::screenshot_name(self.engine.frame());
                if let Err(err) = export::save_png(&self.framebuffer, &path) {
                    log::warn!("screenshot failed: {err}");
                }
            }
            Action::Exit => {
                self.teardown();
                event_loop.exit();
            }
        }
    }

    fn tick(&mut self, now: Instant, event_loop: &ActiveEventLoop) {
        let (width, height) = self.engine.size();
        for event in self.storm.poll(now, width, height) {
            self.engine.storm_event(&event);
        }

        let report = self.engine.tick(&mut self.framebuffer);
        self.telemetry.record(report, now);
        self.draw_overlay(now);

        let border = self.engine.config().theme.clear_color();
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.render_or_recover(&self.framebuffer, border) == FrameOutcome::Fatal {
            self.teardown();
            event_loop.exit();
        }
    }

    fn draw_overlay(&mut self, now: Instant) {
        let style = GlyphStyle::new(overlay_color(&self.engine), 0.9, OVERLAY_FONT_SIZE);
        let line_height = ((GLYPH_ROWS + 3) * pixel_scale(OVERLAY_FONT_SIZE)) as f32;
        let mut baseline = line_height;

        if self.show_stats {
            let summary = self.telemetry.summary();
            self.framebuffer.draw_text(&summary, Vec2::new(8.0, baseline), &style);
            baseline += line_height;
        }
        if self.storm.is_active() {
            let left = self.storm.time_left(now).as_secs_f32().ceil();
            let text = format!("STORM {left:.0}S");
            self.framebuffer.draw_text(&text, Vec2::new(8.0, baseline), &style);
        }
    }

    /// Release the storm, engine and GPU state. Safe to call repeatedly.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.storm.stop();
        self.engine.dispose();
        self.gpu = None;
        self.window = None;
        log::debug!("viewer torn down after {} ticks", self.ticker.ticks());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.torn_down {
            return;
        }
        let (width, height) = self.initial_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.error = Some(err.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => {
                self.error = Some(err.into());
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        self.window = Some(window);
        self.resize(size.width, size.height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.torn_down {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size.width, physical_size.height);
            }
            event => {
                if let Some(action) = self.input.handle_event(&event) {
                    self.apply(action, event_loop);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.torn_down {
            return;
        }
        let now = Instant::now();
        if self.ticker.due(now) {
            self.tick(now, event_loop);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.ticker.next_deadline()));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Readable against either theme.
fn overlay_color(engine: &Engine) -> Rgb {
    let clear = engine.config().theme.clear_color();
    let luma = 0.299 * clear.r as f32 + 0.587 * clear.g as f32 + 0.114 * clear.b as f32;
    if luma > 128.0 {
        Rgb::new(20, 20, 20)
    } else {
        Rgb::new(235, 235, 235)
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
