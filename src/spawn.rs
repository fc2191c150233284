//! Spawn context for effect generators.
//!
//! Every effect generator receives a [`SpawnContext`]: the click origin, the
//! tunables snapshotted at click time, and helpers for the random draws the
//! generators share.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Glyph alphabet used for random characters.
pub const LETTERS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0',
];

/// Glyphs drawn by binary particles.
pub const BINARY_DIGITS: &[char] = &['0', '1'];

/// Uniformly pick one character from `alphabet`.
///
/// `alphabet` must not be empty.
#[inline]
pub fn pick<R: Rng + ?Sized>(rng: &mut R, alphabet: &[char]) -> char {
    alphabet[rng.gen_range(0..alphabet.len())]
}

/// Scale a base population by a multiplier, rounding to the nearest integer.
///
/// Never negative; non-finite multipliers yield zero.
#[inline]
pub fn scaled_count(base: f32, multiplier: f32) -> usize {
    let n = (base * multiplier).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Scale a base lifetime (frames) by a multiplier, rounding to the nearest integer.
#[inline]
pub fn scaled_life(base: f32, multiplier: f32) -> i32 {
    let n = (base * multiplier).round();
    if n.is_finite() && n > 0.0 {
        n.min(i32::MAX as f32) as i32
    } else {
        0
    }
}

/// Inputs and random helpers for one spawn.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(Vec2::new(100.0, 100.0), 10.0);
/// let count = ctx.count(20.0);      // round(20 * count multiplier)
/// let life = ctx.life(30.0);        // round(30 * lifetime multiplier)
/// let dir = SpawnContext::direction(ctx.random_angle()); // unit vector
/// ```
pub struct SpawnContext {
    /// Click position.
    pub origin: Vec2,
    /// Population multiplier.
    pub count_multiplier: f32,
    /// Lifetime multiplier.
    pub lifetime_multiplier: f32,
    /// Speed multiplier at click time.
    pub speed_multiplier: f32,
    /// Grid cell size in pixels.
    pub font_size: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Context with unit multipliers.
    pub fn new(origin: Vec2, font_size: f32) -> Self {
        Self {
            origin,
            count_multiplier: 1.0,
            lifetime_multiplier: 1.0,
            speed_multiplier: 1.0,
            font_size,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_multipliers(mut self, count: f32, lifetime: f32, speed: f32) -> Self {
        self.count_multiplier = count;
        self.lifetime_multiplier = lifetime;
        self.speed_multiplier = speed;
        self
    }

    /// `round(base * count_multiplier)`, never negative.
    #[inline]
    pub fn count(&self, base: f32) -> usize {
        scaled_count(base, self.count_multiplier)
    }

    /// `round(base * lifetime_multiplier)`, never negative.
    #[inline]
    pub fn life(&self, base: f32) -> i32 {
        scaled_life(base, self.lifetime_multiplier)
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random f32 in `[-half, half)`.
    #[inline]
    pub fn jitter(&mut self, half: f32) -> f32 {
        self.random_range(-half, half)
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.gen::<f32>() < p
    }

    // ========== Glyph helpers ==========

    pub fn random_letter(&mut self) -> char {
        pick(&mut self.rng, LETTERS)
    }

    // ========== Direction helpers ==========

    /// Random heading in `[0, 2π)`.
    pub fn random_angle(&mut self) -> f32 {
        self.rng.gen::<f32>() * TAU
    }

    /// Unit vector at `angle`.
    #[inline]
    pub fn direction(angle: f32) -> Vec2 {
        Vec2::from_angle(angle)
    }

    /// Heading of the `index`-th of `count` evenly spaced spokes.
    #[inline]
    pub fn spoke_angle(index: usize, count: usize) -> f32 {
        TAU * index as f32 / count.max(1) as f32
    }

    /// Snap a pixel coordinate down to its grid column.
    #[inline]
    pub fn snap_down(&self, value: f32) -> f32 {
        if self.font_size <= 0.0 {
            return value;
        }
        (value / self.font_size).floor() * self.font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_count_rounds() {
        assert_eq!(scaled_count(20.0, 1.0), 20);
        assert_eq!(scaled_count(20.0, 1.5), 30);
        assert_eq!(scaled_count(12.0, 0.3), 4); // 3.6
        assert_eq!(scaled_count(8.0, 0.0625), 1); // 0.5 rounds up
        assert_eq!(scaled_count(20.0, -1.0), 0);
        assert_eq!(scaled_count(20.0, f32::NAN), 0);
    }

    #[test]
    fn test_scaled_life() {
        assert_eq!(scaled_life(30.0, 1.0), 30);
        assert_eq!(scaled_life(80.0, 0.2), 16);
        assert_eq!(scaled_life(30.0, 0.0), 0);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut ctx = SpawnContext::new(Vec2::ZERO, 10.0);
        for _ in 0..500 {
            let v = ctx.random_range(3.0, 6.0);
            assert!((3.0..6.0).contains(&v));
            let j = ctx.jitter(25.0);
            assert!((-25.0..25.0).contains(&j));
        }
    }

    #[test]
    fn test_spoke_angles() {
        assert_eq!(SpawnContext::spoke_angle(0, 4), 0.0);
        assert!((SpawnContext::spoke_angle(2, 4) - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(SpawnContext::spoke_angle(0, 0), 0.0);
    }

    #[test]
    fn test_snap_down() {
        let ctx = SpawnContext::new(Vec2::ZERO, 10.0);
        assert_eq!(ctx.snap_down(57.0), 50.0);
        assert_eq!(ctx.snap_down(-3.0), -10.0);
    }

    #[test]
    fn test_random_letter_in_alphabet() {
        let mut ctx = SpawnContext::new(Vec2::ZERO, 10.0);
        for _ in 0..100 {
            assert!(LETTERS.contains(&ctx.random_letter()));
        }
    }
}
