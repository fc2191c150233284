//! Engine tunables.
//!
//! One [`EngineConfig`] cell lives inside the engine and is replaced
//! wholesale through [`Engine::set_config`](crate::Engine::set_config).
//! Spawns read it at click time; ticks read it at the start of each frame.
//! Configs serialize to JSON with snake_case keys and every field defaulted,
//! so a partial file like `{"click_effect": "cube"}` is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::background::BackgroundMode;
use crate::color::Rgb;
use crate::effects::ClickEffect;
use crate::error::ConfigError;

/// Page theme; selects the clear color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Color the canvas is cleared or faded toward.
    pub fn clear_color(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(21, 31, 55),
            Theme::Light => Rgb::new(250, 250, 245),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Freeze the background; particles, shapes and ripples keep going.
    pub paused: bool,
    pub click_effect: ClickEffect,
    /// Per-tick velocity multiplier.
    pub particle_speed: f32,
    /// Population multiplier applied at spawn.
    pub particle_count: f32,
    /// Lifetime multiplier applied at spawn.
    pub particle_lifetime: f32,
    /// Particle glyph color as `#rrggbb`.
    pub particle_color: String,
    /// Background glyph color as `#rrggbb`.
    pub background_color: String,
    pub background_mode: BackgroundMode,
    pub background_speed: f32,
    pub ripple_intensity: f32,
    /// Override glyph for ripples; empty means random letters.
    pub ripple_character: String,
    /// Glyphs drawn around each ripple ring.
    pub ripple_particle_limit: u32,
    /// Also the background trail fade alpha (capped at 0.5).
    pub ripple_fade_speed: f32,
    pub ripple_fade_from_center: bool,
    pub ripple_max_count: u32,
    pub enable_trails: bool,
    pub enable_mouse_ripples: bool,
    pub theme: Theme,
    /// Grid cell size in pixels.
    pub font_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paused: false,
            click_effect: ClickEffect::Random,
            particle_speed: 1.0,
            particle_count: 1.0,
            particle_lifetime: 1.0,
            particle_color: "#1DD11D".into(),
            background_color: "#1DD11D".into(),
            background_mode: BackgroundMode::Matrix,
            background_speed: 1.0,
            ripple_intensity: 1.0,
            ripple_character: String::new(),
            ripple_particle_limit: 20,
            ripple_fade_speed: 0.05,
            ripple_fade_from_center: false,
            ripple_max_count: 50,
            enable_trails: true,
            enable_mouse_ripples: true,
            theme: Theme::Dark,
            font_size: 10.0,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path`, or fall back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    pub fn particle_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.particle_color)
    }

    pub fn background_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.background_color)
    }

    /// The ripple override glyph, if one is set.
    pub fn ripple_glyph(&self) -> Option<char> {
        self.ripple_character.chars().next()
    }

    /// Whether pointer movement should leave ripples at all.
    pub fn ripples_active(&self) -> bool {
        self.enable_mouse_ripples && self.ripple_intensity != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.click_effect, ClickEffect::Random);
        assert_eq!(config.ripple_particle_limit, 20);
        assert_eq!(config.ripple_max_count, 50);
        assert_eq!(config.font_size, 10.0);
        assert_eq!(config.particle_rgb(), Rgb::new(0x1d, 0xd1, 0x1d));
        assert!(config.ripples_active());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "click_effect": "matrix_rain", "background_mode": "waves", "theme": "light" }"#,
        )
        .unwrap();
        assert_eq!(config.click_effect, ClickEffect::Kind(EffectKind::MatrixRain));
        assert_eq!(config.background_mode, BackgroundMode::Waves);
        assert_eq!(config.theme.clear_color(), Rgb::new(250, 250, 245));
        assert_eq!(config.particle_speed, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig {
            click_effect: ClickEffect::Kind(EffectKind::Octahedron),
            ripple_character: "≈".into(),
            ..Default::default()
        };
        let parsed = EngineConfig::from_json_str(&config.to_json_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.ripple_glyph(), Some('≈'));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ \"click_effect\": \"sparkles\" }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("stormwave-config-{}.json", std::process::id()));
        let config = EngineConfig {
            particle_count: 2.5,
            paused: true,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = EngineConfig::load_or_default("/definitely/not/here/stormwave.json");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_zero_intensity_disables_ripples() {
        let config = EngineConfig {
            ripple_intensity: 0.0,
            ..Default::default()
        };
        assert!(!config.ripples_active());
    }
}
