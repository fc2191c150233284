//! Performance presets.
//!
//! Each [`PerformanceMode`] bounds the expensive tunables: population and
//! lifetime multipliers, ripple density, and which background modes and
//! click effects are allowed at all.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::background::BackgroundMode;
use crate::config::EngineConfig;
use crate::effects::{ClickEffect, EffectKind};

/// Colors [`randomize`] chooses from.
pub const PALETTE: [&str; 8] = [
    "#1DD11D", "#FF0080", "#00FFFF", "#FFFF00", "#FF4500", "#9932CC", "#00FF00", "#FF1493",
];

/// Ripple characters [`randomize`] chooses from; empty means random letters.
pub const RIPPLE_CHARACTERS: [&str; 14] = [
    "", "~", "≈", "o", "O", "*", "•", "∘", "q", "x", "u", "1", "8", "5",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMode {
    #[default]
    High,
    Medium,
    Low,
}

impl PerformanceMode {
    pub fn preset(self) -> PerformancePreset {
        use BackgroundMode as B;
        use EffectKind as E;

        let every_effect = || {
            EffectKind::ALL
                .into_iter()
                .map(ClickEffect::Kind)
                .chain(std::iter::once(ClickEffect::Random))
                .collect()
        };

        match self {
            PerformanceMode::High => PerformancePreset {
                particle_count: 0.5..=3.0,
                particle_lifetime: 0.2..=30.0,
                ripple_particle_limit: 1..=50,
                ripple_max_count: 5..=200,
                background_modes: BackgroundMode::ALL.to_vec(),
                effects: every_effect(),
            },
            PerformanceMode::Medium => PerformancePreset {
                particle_count: 0.5..=2.0,
                particle_lifetime: 0.2..=15.0,
                ripple_particle_limit: 1..=30,
                ripple_max_count: 5..=100,
                background_modes: BackgroundMode::ALL.to_vec(),
                effects: every_effect(),
            },
            PerformanceMode::Low => PerformancePreset {
                particle_count: 0.5..=1.2,
                particle_lifetime: 0.2..=5.0,
                ripple_particle_limit: 1..=8,
                ripple_max_count: 5..=25,
                background_modes: vec![B::Matrix, B::Sparkle, B::Grid],
                effects: [
                    E::Explosion,
                    E::Waterfall,
                    E::Crack,
                    E::Star,
                    E::MatrixRain,
                    E::Binary,
                    E::Cascade,
                    E::Square,
                    E::Diamond,
                ]
                .into_iter()
                .map(ClickEffect::Kind)
                .chain(std::iter::once(ClickEffect::Random))
                .collect(),
            },
        }
    }

    /// Cycle high → medium → low → high.
    pub fn next(self) -> Self {
        match self {
            PerformanceMode::High => PerformanceMode::Medium,
            PerformanceMode::Medium => PerformanceMode::Low,
            PerformanceMode::Low => PerformanceMode::High,
        }
    }
}

/// Allowed ranges for one performance mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePreset {
    pub particle_count: RangeInclusive<f32>,
    pub particle_lifetime: RangeInclusive<f32>,
    pub ripple_particle_limit: RangeInclusive<u32>,
    pub ripple_max_count: RangeInclusive<u32>,
    /// Never empty.
    pub background_modes: Vec<BackgroundMode>,
    /// Never empty.
    pub effects: Vec<ClickEffect>,
}

impl PerformancePreset {
    pub fn allows_mode(&self, mode: BackgroundMode) -> bool {
        self.background_modes.contains(&mode)
    }

    pub fn allows_effect(&self, effect: ClickEffect) -> bool {
        self.effects.contains(&effect)
    }

    /// Whether cube and octahedron are allowed.
    pub fn allows_shapes(&self) -> bool {
        self.allows_effect(ClickEffect::Kind(EffectKind::Cube))
    }

    /// Pull `config` inside this preset.
    ///
    /// Numeric tunables are clamped; a disallowed mode or effect is replaced
    /// by the first allowed one.
    pub fn clamp(&self, config: &mut EngineConfig) {
        config.particle_count = clamp_f32(config.particle_count, &self.particle_count);
        config.particle_lifetime = clamp_f32(config.particle_lifetime, &self.particle_lifetime);
        config.ripple_particle_limit = config
            .ripple_particle_limit
            .clamp(*self.ripple_particle_limit.start(), *self.ripple_particle_limit.end());
        config.ripple_max_count = config
            .ripple_max_count
            .clamp(*self.ripple_max_count.start(), *self.ripple_max_count.end());
        if !self.allows_mode(config.background_mode) {
            config.background_mode = self.background_modes[0];
        }
        if !self.allows_effect(config.click_effect) {
            config.click_effect = self.effects[0];
        }
    }

    /// Draw every tunable at random within this preset.
    pub fn randomize<R: Rng + ?Sized>(&self, config: &mut EngineConfig, rng: &mut R) {
        config.background_mode = self.background_modes[rng.gen_range(0..self.background_modes.len())];
        config.click_effect = self.effects[rng.gen_range(0..self.effects.len())];

        config.particle_speed = round_to(rng.gen_range(0.1..3.0), 1);
        config.particle_count = round_to(random_in(rng, &self.particle_count), 1);
        config.particle_color = PALETTE[rng.gen_range(0..PALETTE.len())].to_string();
        config.background_color = PALETTE[rng.gen_range(0..PALETTE.len())].to_string();
        config.particle_lifetime = round_to(random_in(rng, &self.particle_lifetime), 1);
        config.background_speed = round_to(rng.gen_range(0.1..3.0), 1);
        config.ripple_intensity = round_to(rng.gen_range(0.0..3.0), 1);
        config.ripple_character = RIPPLE_CHARACTERS[rng.gen_range(0..RIPPLE_CHARACTERS.len())].to_string();
        config.ripple_particle_limit = rng.gen_range(self.ripple_particle_limit.clone());
        config.ripple_fade_speed = round_to(rng.gen_range(0.01..0.5), 2);
        config.ripple_fade_from_center = rng.gen_bool(0.5);
        config.ripple_max_count = rng.gen_range(self.ripple_max_count.clone());

        // Rounding can nudge a value just past a bound.
        self.clamp(config);
    }
}

/// Clamp `config` to `mode`'s preset.
pub fn clamp(mode: PerformanceMode, config: &mut EngineConfig) {
    mode.preset().clamp(config);
}

/// Randomize `config` within `mode`'s preset.
pub fn randomize<R: Rng + ?Sized>(mode: PerformanceMode, config: &mut EngineConfig, rng: &mut R) {
    mode.preset().randomize(config, rng);
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

fn random_in<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f32>) -> f32 {
    rng.gen_range(*range.start()..*range.end())
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}
