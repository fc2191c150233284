//! Glyph particles.
//!
//! A particle is a single character sprite with a position, a velocity and a
//! frame-counted lifetime. Most particles carry a literal character picked at
//! spawn; a few kinds carry a behavior marker instead, which switches on
//! extra per-tick physics and picks the drawn character every frame.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

/// What a particle draws and how it moves beyond plain integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Fixed character chosen at spawn.
    Char(char),
    /// Accelerates downward.
    Waterfall,
    /// Chaotic wandering; occasionally re-aims.
    Fizzle,
    /// Occasionally teleports; drawn with difference blending at random.
    Glitch,
    /// Gravity with a floor bounce near the bottom of the canvas.
    Cascade,
    /// Draws a random `0` or `1` every frame.
    Binary,
}

impl Glyph {
    /// The fixed character, if the glyph has one.
    pub fn literal(self) -> Option<char> {
        match self {
            Glyph::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// A transient glyph sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub glyph: Glyph,
    /// Remaining frames. The particle is removed on the tick this reaches zero.
    pub life: i32,
    /// Lifetime used for alpha (`life / max_life`).
    pub max_life: i32,
    /// Draw with a shadow halo.
    pub glow: bool,
    /// Heading used by [`Glyph::Fizzle`] when it re-aims.
    pub angle: Option<f32>,
    /// Font-size multiplier.
    pub scale: Option<f32>,
}

impl Particle {
    /// A particle with full life and no optional state.
    pub fn new(position: Vec2, velocity: Vec2, glyph: Glyph, life: i32) -> Self {
        let life = life.max(0);
        Self {
            position,
            velocity,
            glyph,
            life,
            max_life: life,
            glow: false,
            angle: None,
            scale: None,
        }
    }

    /// Override the starting life while keeping `max_life`.
    ///
    /// Clamped to `1..=max_life` so a freshly spawned particle is always
    /// drawn at least once.
    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life.clamp(1.min(self.max_life), self.max_life);
        self
    }

    pub fn with_max_life(mut self, max_life: i32) -> Self {
        self.max_life = max_life.max(0);
        self.life = self.life.min(self.max_life);
        self
    }

    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Opacity in `[0, 1]`. A zero `max_life` reads as fully faded.
    #[inline]
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Advance one tick: integrate, apply the marker's forces, age by one.
    ///
    /// `floor` is the canvas height; cascades bounce 50 px above it.
    pub fn advance<R: Rng + ?Sized>(&mut self, speed: f32, floor: f32, rng: &mut R) {
        self.position += self.velocity * speed;

        match self.glyph {
            Glyph::Waterfall => self.velocity.y += 0.3 * speed,
            Glyph::Fizzle => {
                if rng.gen::<f32>() < 0.1 {
                    let angle = self.angle.unwrap_or(0.0) + (rng.gen::<f32>() - 0.5) * PI;
                    let heading_speed = rng.gen_range(2.0..4.0);
                    self.angle = Some(angle);
                    self.velocity = Vec2::from_angle(angle) * heading_speed;
                }
                self.velocity += Vec2::new(rng.gen_range(-0.25..0.25), rng.gen_range(-0.25..0.25));
            }
            Glyph::Glitch => {
                if rng.gen::<f32>() < 0.05 {
                    self.position += Vec2::new(rng.gen_range(-25.0..25.0), rng.gen_range(-10.0..10.0));
                }
            }
            Glyph::Cascade => {
                self.velocity.y += 0.2 * speed;
                if self.position.y > floor - 50.0 && self.velocity.y > 0.0 {
                    self.velocity.y *= -0.5;
                    self.velocity.x *= 0.8;
                }
            }
            Glyph::Char(_) | Glyph::Binary => {}
        }

        self.life -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_starts_at_full_life() {
        let p = Particle::new(Vec2::ZERO, Vec2::X, Glyph::Char('A'), 30);
        assert_eq!(p.life, 30);
        assert_eq!(p.max_life, 30);
        assert_eq!(p.alpha(), 1.0);
    }

    #[test]
    fn test_with_life_is_clamped() {
        let p = Particle::new(Vec2::ZERO, Vec2::ZERO, Glyph::Waterfall, 80).with_life(-12);
        assert_eq!(p.life, 1);
        let p = Particle::new(Vec2::ZERO, Vec2::ZERO, Glyph::Waterfall, 80).with_life(500);
        assert_eq!(p.life, 80);
    }

    #[test]
    fn test_zero_max_life_alpha() {
        let p = Particle::new(Vec2::ZERO, Vec2::ZERO, Glyph::Binary, 0);
        assert_eq!(p.alpha(), 0.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_plain_particle_integrates_with_speed() {
        let mut rng = SmallRng::from_entropy();
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, -2.0), Glyph::Char('A'), 10);
        p.advance(1.5, 600.0, &mut rng);
        assert_eq!(p.position, Vec2::new(1.5, -3.0));
        assert_eq!(p.velocity, Vec2::new(1.0, -2.0));
        assert_eq!(p.life, 9);
    }

    #[test]
    fn test_waterfall_accelerates() {
        let mut rng = SmallRng::from_entropy();
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(0.0, 2.0), Glyph::Waterfall, 10);
        p.advance(1.0, 600.0, &mut rng);
        assert!((p.velocity.y - 2.3).abs() < 1e-6);
    }

    #[test]
    fn test_cascade_bounces_off_floor() {
        let mut rng = SmallRng::from_entropy();
        let mut p = Particle::new(Vec2::new(0.0, 560.0), Vec2::new(1.0, 4.0), Glyph::Cascade, 10);
        p.advance(1.0, 600.0, &mut rng);
        assert!((p.velocity.y - (-2.1)).abs() < 1e-5);
        assert!((p.velocity.x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_fizzle_stays_bounded() {
        let mut rng = SmallRng::from_entropy();
        let mut p = Particle::new(Vec2::ZERO, Vec2::X, Glyph::Fizzle, 1000).with_angle(0.0);
        for _ in 0..200 {
            p.advance(1.0, 600.0, &mut rng);
            assert!(p.velocity.is_finite());
        }
        assert!(p.angle.is_some());
        assert_eq!(p.life, 800);
    }

    #[test]
    fn test_glitch_teleports_within_range() {
        let mut rng = SmallRng::from_entropy();
        for _ in 0..200 {
            let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, Glyph::Glitch, 10);
            p.advance(1.0, 600.0, &mut rng);
            assert!(p.position.x.abs() <= 25.0 && p.position.y.abs() <= 10.0);
        }
    }

    #[test]
    fn test_literal() {
        assert_eq!(Glyph::Char('Q').literal(), Some('Q'));
        assert_eq!(Glyph::Fizzle.literal(), None);
    }
}
