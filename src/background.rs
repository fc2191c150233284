//! Procedural backgrounds.
//!
//! Five painters share one monotonic clock and a per-cell letter cache:
//!
//! - **matrix**: one falling counter per column, glyph re-rolled every draw
//! - **pulse**: rings radiating from the canvas center
//! - **sparkle**: 100 drifting grains twinkling on their own phase
//! - **waves**: every cell bobs on a sine across columns
//! - **grid**: every third cell blinks on a diagonal sine
//!
//! The letter cache, the matrix counters and the grain pool are rebuilt on
//! every resize.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, GlyphStyle};
use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::spawn::{pick, LETTERS};

/// Number of sparkle grains.
pub const GRAIN_COUNT: usize = 100;

/// Which painter runs under the particles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    #[default]
    Matrix,
    Pulse,
    Sparkle,
    Waves,
    Grid,
}

impl BackgroundMode {
    pub const ALL: [BackgroundMode; 5] = [
        BackgroundMode::Matrix,
        BackgroundMode::Pulse,
        BackgroundMode::Sparkle,
        BackgroundMode::Waves,
        BackgroundMode::Grid,
    ];
}

/// An ambient point used by the sparkle painter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundGrain {
    pub position: Vec2,
    /// Last computed opacity in `[0, 1]`.
    pub alpha: f32,
    pub size: f32,
    /// Twinkle phase offset in `[0, 2π)`.
    pub phase: f32,
}

/// Opacity of the per-tick clear.
///
/// Opaque for waves or when trails are off; otherwise the ripple fade speed,
/// capped at 0.5, so previous frames linger as trails.
pub fn clear_alpha(mode: BackgroundMode, enable_trails: bool, ripple_fade_speed: f32) -> f32 {
    if mode == BackgroundMode::Waves || !enable_trails {
        1.0
    } else {
        ripple_fade_speed.min(0.5).max(0.0)
    }
}

/// Grid dimensions for a canvas: `(ceil(w / fs), floor(h / fs))`.
pub fn grid_dims(width: u32, height: u32, font_size: f32) -> (usize, usize) {
    if !(font_size > 0.0) {
        return (0, 0);
    }
    let columns = (width as f32 / font_size).ceil() as usize;
    let rows = (height as f32 / font_size).floor() as usize;
    (columns, rows)
}

/// Background state: clock, letter cache, matrix columns and grain pool.
#[derive(Debug)]
pub struct Background {
    time: f32,
    width: u32,
    height: u32,
    font_size: f32,
    columns: usize,
    rows: usize,
    /// Column-major, `columns * rows`.
    letters: Vec<char>,
    drops: Vec<u32>,
    grains: Vec<BackgroundGrain>,
    rng: SmallRng,
}

impl Background {
    pub fn new(width: u32, height: u32, font_size: f32) -> Self {
        let mut background = Self {
            time: 0.0,
            width: 0,
            height: 0,
            font_size,
            columns: 0,
            rows: 0,
            letters: Vec::new(),
            drops: Vec::new(),
            grains: Vec::new(),
            rng: SmallRng::from_entropy(),
        };
        background.resize(width, height, font_size);
        background
    }

    /// Rebuild the letter cache, matrix columns and grain pool.
    ///
    /// The grain pool is replaced, never appended to, so it always holds
    /// exactly [`GRAIN_COUNT`] grains.
    pub fn resize(&mut self, width: u32, height: u32, font_size: f32) {
        self.width = width;
        self.height = height;
        self.font_size = font_size;
        (self.columns, self.rows) = grid_dims(width, height, font_size);

        let rng = &mut self.rng;
        self.letters = (0..self.columns * self.rows)
            .map(|_| pick(rng, LETTERS))
            .collect();
        self.drops = vec![1; self.columns];

        let (w, h) = (width as f32, height as f32);
        self.grains = (0..GRAIN_COUNT)
            .map(|_| BackgroundGrain {
                position: Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h),
                alpha: rng.gen(),
                size: rng.gen::<f32>() * 3.0 + 1.0,
                phase: rng.gen::<f32>() * TAU,
            })
            .collect();
    }

    /// Clear or fade the canvas, advance the clock and run the active painter.
    pub fn render(&mut self, canvas: &mut dyn Canvas, config: &EngineConfig) {
        let alpha = clear_alpha(config.background_mode, config.enable_trails, config.ripple_fade_speed);
        canvas.fill(config.theme.clear_color(), alpha);

        self.time += 0.02 * config.background_speed;

        let color = config.background_rgb();
        match config.background_mode {
            BackgroundMode::Matrix => self.paint_matrix(canvas, color),
            BackgroundMode::Pulse => self.paint_pulse(canvas, color),
            BackgroundMode::Sparkle => self.paint_sparkle(canvas, color, config.background_speed),
            BackgroundMode::Waves => self.paint_waves(canvas, color),
            BackgroundMode::Grid => self.paint_grid(canvas, color),
        }
    }

    fn style(&self, color: Rgb, alpha: f32) -> GlyphStyle {
        GlyphStyle::new(color, alpha, self.font_size)
    }

    fn cell(&self, column: usize, row: f32) -> Vec2 {
        Vec2::new(column as f32 * self.font_size, row * self.font_size)
    }

    fn paint_matrix(&mut self, canvas: &mut dyn Canvas, color: Rgb) {
        let style = self.style(color, 0.8);
        for column in 0..self.drops.len() {
            let ch = pick(&mut self.rng, LETTERS);
            let drop = self.drops[column];
            canvas.draw_glyph(ch, self.cell(column, drop as f32), &style);

            if drop as f32 * self.font_size > self.height as f32 && self.rng.gen::<f32>() > 0.975 {
                self.drops[column] = 0;
            }
            self.drops[column] += 1;
        }
    }

    fn paint_pulse(&self, canvas: &mut dyn Canvas, color: Rgb) {
        let center = Vec2::new(self.columns as f32 / 2.0, self.rows as f32 / 2.0);
        for x in 0..self.columns {
            for y in 0..self.rows {
                let distance = Vec2::new(x as f32, y as f32).distance(center);
                let offset = (self.time - distance * 0.1).sin();
                if offset > 0.7 {
                    let style = self.style(color, (offset - 0.7) * 1.5);
                    canvas.draw_glyph(self.letters[x * self.rows + y], self.cell(x, y as f32), &style);
                }
            }
        }
    }

    fn paint_sparkle(&mut self, canvas: &mut dyn Canvas, color: Rgb, speed: f32) {
        let (w, h) = (self.width as f32, self.height as f32);
        for i in 0..self.grains.len() {
            let drift = Vec2::new(self.rng.gen_range(-1.0..1.0), self.rng.gen_range(-1.0..1.0)) * speed;
            let respawn = self.rng.gen::<f32>() < 0.005;
            let fresh = Vec2::new(self.rng.gen::<f32>() * w, self.rng.gen::<f32>() * h);
            let fresh_phase = self.rng.gen::<f32>() * TAU;

            let grain = &mut self.grains[i];
            grain.position += drift;
            if grain.position.x < 0.0 {
                grain.position.x = w;
            } else if grain.position.x > w {
                grain.position.x = 0.0;
            }
            if grain.position.y < 0.0 {
                grain.position.y = h;
            } else if grain.position.y > h {
                grain.position.y = 0.0;
            }
            if respawn {
                grain.position = fresh;
                grain.phase = fresh_phase;
            }
            grain.alpha = ((self.time * 2.0 + grain.phase).sin() + 1.0) / 2.0;

            let grain = *grain;
            if let Some((x, y, ch)) = self.letter_under(grain.position) {
                canvas.draw_glyph(ch, self.cell(x, y as f32), &self.style(color, grain.alpha * 0.5));
            }
        }
    }

    fn paint_waves(&self, canvas: &mut dyn Canvas, color: Rgb) {
        for x in 0..self.columns {
            let offset = (self.time + x as f32 * 0.2).sin() * 2.0;
            let style = self.style(color, 0.1 + offset.abs() / 2.0 * 0.7);
            for y in 0..self.rows {
                canvas.draw_glyph(self.letters[x * self.rows + y], self.cell(x, y as f32 + offset), &style);
            }
        }
    }

    fn paint_grid(&self, canvas: &mut dyn Canvas, color: Rgb) {
        for x in (0..self.columns).step_by(3) {
            for y in (0..self.rows).step_by(3) {
                let pulse = (self.time * 2.0 + x as f32 * 0.5 + y as f32 * 0.5).sin();
                if pulse > 0.5 {
                    let style = self.style(color, pulse * 0.3);
                    canvas.draw_glyph(self.letters[x * self.rows + y], self.cell(x, y as f32), &style);
                }
            }
        }
    }

    /// Cached letter for a cell.
    pub fn letter_at(&self, column: usize, row: usize) -> Option<char> {
        if column < self.columns && row < self.rows {
            Some(self.letters[column * self.rows + row])
        } else {
            None
        }
    }

    fn letter_under(&self, position: Vec2) -> Option<(usize, usize, char)> {
        if !(self.font_size > 0.0) || position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let x = (position.x / self.font_size).floor() as usize;
        let y = (position.y / self.font_size).floor() as usize;
        self.letter_at(x, y).map(|ch| (x, y, ch))
    }

    /// Background clock.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn grains(&self) -> &[BackgroundGrain] {
        &self.grains
    }

    pub fn grain_count(&self) -> usize {
        self.grains.len()
    }

    /// `(columns, rows)` of the letter grid.
    pub fn grid(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Framebuffer;

    #[test]
    fn test_grid_dims() {
        assert_eq!(grid_dims(800, 600, 10.0), (80, 60));
        assert_eq!(grid_dims(805, 609, 10.0), (81, 60));
        assert_eq!(grid_dims(800, 600, 0.0), (0, 0));
    }

    #[test]
    fn test_clear_policy() {
        assert_eq!(clear_alpha(BackgroundMode::Waves, true, 0.05), 1.0);
        assert_eq!(clear_alpha(BackgroundMode::Matrix, false, 0.05), 1.0);
        assert_eq!(clear_alpha(BackgroundMode::Matrix, true, 0.05), 0.05);
        assert_eq!(clear_alpha(BackgroundMode::Grid, true, 0.9), 0.5);
    }

    #[test]
    fn test_resize_replaces_pool() {
        let mut bg = Background::new(320, 240, 10.0);
        assert_eq!(bg.grain_count(), GRAIN_COUNT);
        bg.resize(320, 240, 10.0);
        bg.resize(320, 240, 10.0);
        assert_eq!(bg.grain_count(), GRAIN_COUNT);
        assert_eq!(bg.grid(), (32, 24));
        assert!(bg.letter_at(31, 23).is_some());
        assert!(bg.letter_at(32, 0).is_none());
    }

    #[test]
    fn test_grains_in_bounds_and_sized() {
        let bg = Background::new(200, 100, 10.0);
        for g in bg.grains() {
            assert!(g.position.x >= 0.0 && g.position.x <= 200.0);
            assert!(g.position.y >= 0.0 && g.position.y <= 100.0);
            assert!(g.size >= 1.0 && g.size < 4.0);
            assert!(g.phase >= 0.0 && g.phase < TAU + 1e-4);
        }
    }

    #[test]
    fn test_zero_size_canvas() {
        let mut bg = Background::new(0, 0, 10.0);
        let mut fb = Framebuffer::new(0, 0);
        for mode in BackgroundMode::ALL {
            let config = EngineConfig {
                background_mode: mode,
                ..Default::default()
            };
            bg.render(&mut fb, &config);
        }
        assert_eq!(bg.grain_count(), GRAIN_COUNT);
    }

    #[test]
    fn test_clock_advances_with_speed() {
        let mut bg = Background::new(50, 50, 10.0);
        let mut fb = Framebuffer::new(50, 50);
        let config = EngineConfig {
            background_speed: 2.0,
            ..Default::default()
        };
        bg.render(&mut fb, &config);
        bg.render(&mut fb, &config);
        assert!((bg.time() - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_every_mode_paints_something() {
        for mode in BackgroundMode::ALL {
            let mut bg = Background::new(120, 120, 10.0);
            let mut fb = Framebuffer::new(120, 120);
            let config = EngineConfig {
                background_mode: mode,
                background_color: "#FFFFFF".into(),
                ..Default::default()
            };
            let clear = config.theme.clear_color();
            let mut painted = false;
            for _ in 0..200 {
                bg.render(&mut fb, &config);
                painted |= fb.pixels().chunks_exact(4).any(|p| p[0] > clear.r + 20);
            }
            assert!(painted, "{mode:?} never painted");
        }
    }

    #[test]
    fn test_matrix_columns_reset_after_overflow() {
        let mut bg = Background::new(30, 20, 10.0);
        let mut fb = Framebuffer::new(30, 20);
        let config = EngineConfig::default();
        let mut reset_seen = false;
        for _ in 0..2000 {
            bg.render(&mut fb, &config);
            reset_seen |= bg.drops.iter().any(|&d| d == 1);
        }
        assert!(reset_seen);
    }
}
