//! # stormwave
//!
//! A matrix-rain glyph particle engine. Clicks spawn bursts of character
//! particles in one of thirteen effects, the pointer leaves a trail of
//! ripples, and a procedural background animates behind it all.
//!
//! The engine is renderer-agnostic: every tick draws into a [`Canvas`].
//! [`Framebuffer`] is the built-in CPU implementation, and [`Viewer`]
//! presents it in a window through wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stormwave::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     let config = EngineConfig {
//!         click_effect: ClickEffect::Kind(EffectKind::Explosion),
//!         background_mode: BackgroundMode::Sparkle,
//!         ..Default::default()
//!     };
//!     Viewer::new().with_config(config).run()
//! }
//! ```
//!
//! ## Headless
//!
//! ```ignore
//! use stormwave::prelude::*;
//!
//! let mut engine = Engine::new(800, 600, EngineConfig::default());
//! let mut frame = Framebuffer::new(800, 600);
//!
//! engine.click(Vec2::new(400.0, 300.0), ClickTarget::Canvas);
//! for _ in 0..30 {
//!     let report = engine.tick(&mut frame);
//!     println!("{} glyphs alive", report.total);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Effects
//!
//! [`EffectKind`] lists the click effects. Eleven spawn glyph particles; the
//! cube and octahedron spawn a rotating wireframe [`Shape3D`] instead.
//! [`ClickEffect::Random`] picks one of twelve kinds per click.
//!
//! ### Tick order
//!
//! Each [`Engine::tick`] paints the background (unless paused), advances
//! every particle, shape and ripple once, then draws ripples, particles and
//! shapes in that order and returns a [`PopulationReport`].
//!
//! ### Storms
//!
//! A [`StormController`] emits synthetic clicks at random positions for a
//! few seconds. Feed its events to [`Engine::storm_event`].

pub mod background;
pub mod canvas;
pub mod color;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod export;
pub mod font;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod particle;
pub mod presets;
pub mod ripple;
pub mod shape;
pub mod sound;
pub mod spawn;
pub mod storm;
pub mod time;
mod viewer;

pub use background::{Background, BackgroundMode};
pub use canvas::{Blend, Canvas, Framebuffer, GlyphStyle};
pub use color::Rgb;
pub use config::{EngineConfig, Theme};
pub use effects::{ClickEffect, EffectKind, Spawned};
pub use engine::{ClickTarget, Engine, PopulationReport};
pub use error::{ConfigError, ExportError, GpuError, StormError, ViewerError};
pub use glam::{Vec2, Vec3};
pub use particle::{Glyph, Particle};
pub use presets::{PerformanceMode, PerformancePreset};
pub use ripple::{Ripple, RippleTrail};
pub use shape::Shape3D;
pub use sound::{ParticleTally, SoundHooks};
pub use spawn::SpawnContext;
pub use storm::{Storm, StormController, StormEvent};
pub use time::{Telemetry, Ticker};
pub use viewer::Viewer;

/// Common imports.
pub mod prelude {
    pub use crate::background::BackgroundMode;
    pub use crate::canvas::{Canvas, Framebuffer, GlyphStyle};
    pub use crate::color::Rgb;
    pub use crate::config::{EngineConfig, Theme};
    pub use crate::effects::{ClickEffect, EffectKind};
    pub use crate::engine::{ClickTarget, Engine, PopulationReport};
    pub use crate::error::ViewerError;
    pub use crate::presets::PerformanceMode;
    pub use crate::sound::{ParticleTally, SoundHooks};
    pub use crate::storm::{StormController, StormEvent};
    pub use crate::viewer::Viewer;
    pub use glam::Vec2;
}
