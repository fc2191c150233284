//! The simulation and compositing engine.
//!
//! [`Engine`] owns every population (particles, shapes, ripples, background
//! grains) plus the configuration cell. Input arrives through
//! [`Engine::click`], [`Engine::pointer_move`] and [`Engine::storm_event`];
//! the host calls [`Engine::tick`] once per fixed interval.
//!
//! # Tick order
//!
//! 1. Background clear/fade and paint, unless paused
//! 2. [`Engine::step`]: particle physics, shape rotation, ripple growth
//! 3. Ripples drawn, then expired ripples pruned
//! 4. Particles drawn
//! 5. Expired shapes dropped, live shapes drawn
//! 6. [`PopulationReport`] computed and reported to the sound hooks

use std::f32::consts::TAU;
use std::time::Instant;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::background::Background;
use crate::canvas::{Blend, Canvas, GlyphStyle};
use crate::config::EngineConfig;
use crate::effects::{EffectKind, Spawned};
use crate::particle::{Glyph, Particle};
use crate::ripple::RippleTrail;
use crate::shape::Shape3D;
use crate::sound::SoundHooks;
use crate::spawn::{pick, SpawnContext, BINARY_DIGITS, LETTERS};
use crate::storm::StormEvent;

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The drawing surface or anything non-interactive.
    Canvas,
    /// A button, input or other interactive control; clicks are ignored.
    Control,
}

/// Population counts after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub total: usize,
    pub particles: usize,
    /// Sparkle grain pool size.
    pub background: usize,
    /// Ripple count times the per-ripple glyph limit. A visual estimate.
    pub ripples: usize,
    pub shapes: usize,
}

/// Snap a pixel position to the nearest grid corner.
#[inline]
fn snap(position: Vec2, font_size: f32) -> Vec2 {
    if font_size > 0.0 {
        (position / font_size).round() * font_size
    } else {
        position
    }
}

/// Glyph particle engine.
pub struct Engine {
    config: EngineConfig,
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    shapes: Vec<Shape3D>,
    ripples: RippleTrail,
    background: Background,
    sound: Option<Box<dyn SoundHooks>>,
    rng: SmallRng,
    frame: u64,
    last_report: PopulationReport,
    disposed: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("size", &(self.width, self.height))
            .field("particles", &self.particles.len())
            .field("shapes", &self.shapes.len())
            .field("ripples", &self.ripples.len())
            .field("frame", &self.frame)
            .field("sound", &self.sound.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Engine {
    /// An engine for a `width × height` canvas.
    pub fn new(width: u32, height: u32, config: EngineConfig) -> Self {
        let background = Background::new(width, height, config.font_size);
        Self {
            config,
            width,
            height,
            particles: Vec::new(),
            shapes: Vec::new(),
            ripples: RippleTrail::new(),
            background,
            sound: None,
            rng: SmallRng::from_entropy(),
            frame: 0,
            last_report: PopulationReport::default(),
            disposed: false,
        }
    }

    /// Attach sound hooks.
    pub fn with_sound(mut self, hooks: Box<dyn SoundHooks>) -> Self {
        self.sound = Some(hooks);
        self
    }

    /// Replace or remove the sound hooks.
    pub fn set_sound(&mut self, hooks: Option<Box<dyn SoundHooks>>) {
        self.sound = hooks;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// In-flight particles keep the values they were spawned with. A new font
    /// size rebuilds the background grid.
    pub fn set_config(&mut self, config: EngineConfig) {
        let regrid = config.font_size != self.config.font_size;
        self.config = config;
        if regrid {
            self.background.resize(self.width, self.height, self.config.font_size);
        }
    }

    /// Resize the canvas. Rebuilds the letter cache and grain pool.
    ///
    /// Safe to repeat with the same size; ignored after [`Engine::dispose`].
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        log::debug!("engine resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.background.resize(width, height, self.config.font_size);
    }

    // ========== Input ==========

    /// Handle a click. Clicks on controls are ignored.
    ///
    /// Resolves `random`, spawns, and notifies the sound hooks of the click
    /// and of every particle created. Returns the kind that was spawned.
    pub fn click(&mut self, position: Vec2, target: ClickTarget) -> Option<EffectKind> {
        if self.disposed || target == ClickTarget::Control {
            return None;
        }
        let kind = self.config.click_effect.resolve(&mut self.rng);
        log::debug!("click at ({:.0}, {:.0}) -> {kind}", position.x, position.y);
        let first = self.particles.len();
        self.spawn(kind, position);

        if let Some(sound) = self.sound.as_deref_mut() {
            sound.on_click_event(position.x, position.y, kind);
            for p in &self.particles[first..] {
                sound.on_particle_create(p.position.x, p.position.y, p.velocity.x, p.velocity.y);
            }
        }
        Some(kind)
    }

    /// Handle a synthetic storm click: same spawn path, no sound, no guard.
    pub fn storm_event(&mut self, event: &StormEvent) -> Option<EffectKind> {
        if self.disposed {
            return None;
        }
        let kind = event.effect.resolve(&mut self.rng);
        self.spawn(kind, event.position);
        Some(kind)
    }

    /// Handle pointer or touch movement. Returns whether a ripple was added.
    pub fn pointer_move(&mut self, position: Vec2, now: Instant) -> bool {
        if self.disposed || !self.config.ripples_active() {
            return false;
        }
        self.ripples.pointer_moved(
            position,
            now,
            self.config.ripple_intensity,
            self.config.ripple_max_count as usize,
        )
    }

    /// Run `kind`'s generator at `origin` with the current multipliers.
    fn spawn(&mut self, kind: EffectKind, origin: Vec2) {
        let mut ctx = SpawnContext::new(origin, self.config.font_size).with_multipliers(
            self.config.particle_count,
            self.config.particle_lifetime,
            self.config.particle_speed,
        );
        match kind.spawn(&mut ctx) {
            Spawned::Particles(batch) => self.particles.extend(batch),
            Spawned::Shape(shape) => self.shapes.push(shape),
        }
    }

    // ========== Simulation ==========

    /// Advance every population by one tick.
    ///
    /// Particles integrate, take their marker's forces and age; a particle
    /// whose life reaches zero is reported destroyed and removed right away.
    /// Shapes rotate and age; they are removed by the draw pass. Ripples grow
    /// and age.
    pub fn step(&mut self) {
        let speed = self.config.particle_speed;
        let floor = self.height as f32;
        let rng = &mut self.rng;
        let sound = &mut self.sound;

        self.particles.retain_mut(|p| {
            p.advance(speed, floor, rng);
            if p.life > 0 {
                return true;
            }
            if let Some(sound) = sound.as_deref_mut() {
                sound.on_particle_destroy(p.position.x, p.position.y);
            }
            false
        });

        for shape in &mut self.shapes {
            shape.advance(speed);
        }

        // Ripples age even while paused; pause only freezes the background.
        self.ripples.advance(self.config.ripple_intensity);
    }

    /// Run one full frame into `canvas` and report populations.
    pub fn tick(&mut self, canvas: &mut dyn Canvas) -> PopulationReport {
        if self.disposed {
            return PopulationReport::default();
        }
        if !self.config.paused {
            self.background.render(canvas, &self.config);
        }
        self.step();
        self.draw_ripples(canvas);
        self.draw_particles(canvas);
        self.draw_shapes(canvas);
        self.frame += 1;

        let report = self.report();
        if let Some(sound) = self.sound.as_deref_mut() {
            sound.on_particle_count_update(report.total);
        }
        self.last_report = report;
        report
    }

    fn draw_ripples(&mut self, canvas: &mut dyn Canvas) {
        let fs = self.config.font_size;
        let color = self.config.particle_rgb();
        let glyph = self.config.ripple_glyph();
        let per_ripple = self.config.ripple_particle_limit as usize;

        for ripple in self.ripples.iter() {
            let style = GlyphStyle::new(color, ripple.alpha(self.config.ripple_fade_from_center), fs);
            for j in 0..per_ripple {
                let angle = TAU * j as f32 / per_ripple as f32;
                let position = ripple.center + Vec2::from_angle(angle) * ripple.radius;
                let ch = glyph.unwrap_or_else(|| pick(&mut self.rng, LETTERS));
                canvas.draw_glyph(ch, snap(position, fs), &style);
            }
        }
        self.ripples.prune();
    }

    fn draw_particles(&mut self, canvas: &mut dyn Canvas) {
        let fs = self.config.font_size;
        let color = self.config.particle_rgb();

        for p in &self.particles {
            let alpha = p.alpha();
            let mut style = GlyphStyle::new(color, alpha, fs * p.scale.unwrap_or(1.0));
            if p.glow {
                style = style.with_glow(10.0 * alpha, color);
            }
            if p.glyph == Glyph::Glitch && self.rng.gen::<f32>() < 0.3 {
                style = style.with_blend(Blend::Difference);
            }
            let ch = match (p.glyph.literal(), p.glyph) {
                (Some(c), _) => c,
                (None, Glyph::Binary) => pick(&mut self.rng, BINARY_DIGITS),
                (None, _) => pick(&mut self.rng, LETTERS),
            };
            canvas.draw_glyph(ch, snap(p.position, fs), &style);
        }
    }

    fn draw_shapes(&mut self, canvas: &mut dyn Canvas) {
        let fs = self.config.font_size;
        let color = self.config.particle_rgb();

        self.shapes.retain(|shape| !shape.is_expired());
        for shape in &self.shapes {
            let life_alpha = shape.life_alpha();
            for (a, b) in shape.projected_edges() {
                let alpha = a.scale.min(b.scale).max(0.3) * life_alpha;
                let style = GlyphStyle::new(color, alpha, fs);
                let delta = b.position - a.position;
                let steps = if fs > 0.0 { delta.x.abs().max(delta.y.abs()) / fs } else { 0.0 };

                let mut t = 0.0;
                while t <= steps {
                    let ratio = if steps > 0.0 { t / steps } else { 0.0 };
                    let position = a.position + delta * ratio;
                    canvas.draw_glyph(pick(&mut self.rng, LETTERS), snap(position, fs), &style);
                    t += 0.5;
                }
            }
        }
    }

    // ========== Reporting ==========

    /// Current population counts.
    pub fn report(&self) -> PopulationReport {
        let particles = self.particles.len();
        let background = self.background.grain_count();
        let ripples = self.ripples.len() * self.config.ripple_particle_limit as usize;
        let shapes = self.shapes.len();
        PopulationReport {
            total: particles + background + ripples + shapes,
            particles,
            background,
            ripples,
            shapes,
        }
    }

    /// The report produced by the last [`Engine::tick`].
    pub fn last_report(&self) -> PopulationReport {
        self.last_report
    }

    // ========== Accessors ==========

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shapes(&self) -> &[Shape3D] {
        &self.shapes
    }

    pub fn ripples(&self) -> &RippleTrail {
        &self.ripples
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ========== Teardown ==========

    /// Drop every population and detach the sound hooks.
    ///
    /// After this, input and ticks are no-ops. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.particles.clear();
        self.shapes.clear();
        self.ripples.clear();
        self.sound = None;
        self.disposed = true;
        log::debug!("engine disposed after {} frames", self.frame);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Framebuffer;
    use crate::effects::ClickEffect;

    fn engine_with(effect: EffectKind) -> Engine {
        let config = EngineConfig {
            click_effect: ClickEffect::Kind(effect),
            ..Default::default()
        };
        Engine::new(400, 300, config)
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(Vec2::new(14.0, 16.0), 10.0), Vec2::new(10.0, 20.0));
        assert_eq!(snap(Vec2::new(3.0, 4.0), 0.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_shape_ages_once_per_tick() {
        let mut engine = engine_with(EffectKind::Cube);
        let mut fb = Framebuffer::new(400, 300);
        engine.click(Vec2::new(200.0, 150.0), ClickTarget::Canvas);
        assert_eq!(engine.shapes()[0].life, 50);
        engine.tick(&mut fb);
        assert_eq!(engine.shapes()[0].life, 49);

        let mut ticks = 1;
        while !engine.shapes().is_empty() {
            engine.tick(&mut fb);
            ticks += 1;
        }
        assert_eq!(ticks, 50);
    }

    #[test]
    fn test_paused_keeps_simulating() {
        let mut engine = engine_with(EffectKind::Star);
        let mut fb = Framebuffer::new(400, 300);
        let mut config = engine.config().clone();
        config.paused = true;
        engine.set_config(config);
        engine.click(Vec2::new(200.0, 150.0), ClickTarget::Canvas);
        engine.tick(&mut fb);
        assert_eq!(engine.background().time(), 0.0);
        assert_eq!(engine.particles()[0].life, 49);
    }

    #[test]
    fn test_font_size_change_regrids() {
        let mut engine = Engine::new(400, 300, EngineConfig::default());
        assert_eq!(engine.background().grid(), (40, 30));
        let config = EngineConfig {
            font_size: 20.0,
            ..Default::default()
        };
        engine.set_config(config);
        assert_eq!(engine.background().grid(), (20, 15));
    }

    #[test]
    fn test_disposed_engine_ignores_input() {
        let mut engine = engine_with(EffectKind::Explosion);
        engine.dispose();
        engine.dispose();
        assert!(engine.is_disposed());
        assert_eq!(engine.click(Vec2::ZERO, ClickTarget::Canvas), None);
        assert!(!engine.pointer_move(Vec2::ZERO, Instant::now()));
        let mut fb = Framebuffer::new(10, 10);
        assert_eq!(engine.tick(&mut fb), PopulationReport::default());
    }
}
