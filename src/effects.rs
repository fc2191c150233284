//! Click effects.
//!
//! Thirteen burst generators, one per [`EffectKind`]. Each takes a
//! [`SpawnContext`] (origin plus tunables captured at click time) and returns
//! a batch of particles, or a single wireframe shape for the two 3D kinds.
//!
//! | Kind | Population | Motion |
//! |------|------------|--------|
//! | explosion | `20·count` | even spokes, speed 3–6 |
//! | waterfall | `200/fontSize` columns × `15·count` rows | falls, accelerates |
//! | crack | `12·count` | static ring, glowing |
//! | star | `8·count` | even spokes, speed 2 |
//! | fizzle | `25·count` | chaotic wander |
//! | matrix_rain | `30·count` | falling columns |
//! | glitch | `20·count` | jitter and teleport |
//! | binary | `40·count` | random spray of `0`/`1` |
//! | cascade | `20·count` | fountain with floor bounce |
//! | square | `4 × 12·count` | sides push outward |
//! | diamond | `4 × 10·count` | sides push out diagonally, glowing |
//! | cube / octahedron | one shape | spins in place |

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::{Glyph, Particle};
use crate::shape::Shape3D;
use crate::spawn::{scaled_count, SpawnContext};

/// A concrete burst generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Explosion,
    Waterfall,
    Crack,
    Star,
    Fizzle,
    MatrixRain,
    Glitch,
    Binary,
    Cascade,
    Square,
    Diamond,
    Cube,
    Octahedron,
}

/// What a generator produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Spawned {
    Particles(Vec<Particle>),
    Shape(Shape3D),
}

impl Spawned {
    /// Number of particles in the batch (zero for shapes).
    pub fn particle_count(&self) -> usize {
        match self {
            Spawned::Particles(batch) => batch.len(),
            Spawned::Shape(_) => 0,
        }
    }
}

/// Generator signature shared by every effect.
pub type SpawnFn = fn(&mut SpawnContext) -> Spawned;

/// Generators indexed by `EffectKind as usize`.
const SPAWN_TABLE: [SpawnFn; EffectKind::COUNT] = [
    spawn_explosion,
    spawn_waterfall,
    spawn_crack,
    spawn_star,
    spawn_fizzle,
    spawn_matrix_rain,
    spawn_glitch,
    spawn_binary,
    spawn_cascade,
    spawn_square,
    spawn_diamond,
    spawn_cube,
    spawn_octahedron,
];

impl EffectKind {
    pub const COUNT: usize = 13;

    /// Every kind, in declaration order.
    pub const ALL: [EffectKind; EffectKind::COUNT] = [
        EffectKind::Explosion,
        EffectKind::Waterfall,
        EffectKind::Crack,
        EffectKind::Star,
        EffectKind::Fizzle,
        EffectKind::MatrixRain,
        EffectKind::Glitch,
        EffectKind::Binary,
        EffectKind::Cascade,
        EffectKind::Square,
        EffectKind::Diamond,
        EffectKind::Cube,
        EffectKind::Octahedron,
    ];

    /// Kinds `random` resolves to. Glitch is never picked at random.
    pub const RANDOM_POOL: [EffectKind; 12] = [
        EffectKind::Explosion,
        EffectKind::Waterfall,
        EffectKind::Crack,
        EffectKind::Star,
        EffectKind::Fizzle,
        EffectKind::MatrixRain,
        EffectKind::Binary,
        EffectKind::Cascade,
        EffectKind::Square,
        EffectKind::Diamond,
        EffectKind::Cube,
        EffectKind::Octahedron,
    ];

    /// The generator for this kind.
    #[inline]
    pub fn spawner(self) -> SpawnFn {
        SPAWN_TABLE[self as usize]
    }

    /// Run this kind's generator.
    pub fn spawn(self, ctx: &mut SpawnContext) -> Spawned {
        (self.spawner())(ctx)
    }

    /// Whether this kind produces a wireframe shape instead of particles.
    pub fn is_shape(self) -> bool {
        matches!(self, EffectKind::Cube | EffectKind::Octahedron)
    }

    /// Particles one burst of this kind produces.
    pub fn population(self, count_multiplier: f32, font_size: f32) -> usize {
        let n = |base| scaled_count(base, count_multiplier);
        match self {
            EffectKind::Explosion => n(20.0),
            EffectKind::Waterfall => waterfall_columns(font_size) * n(15.0),
            EffectKind::Crack => n(12.0),
            EffectKind::Star => n(8.0),
            EffectKind::Fizzle => n(25.0),
            EffectKind::MatrixRain => n(30.0),
            EffectKind::Glitch => n(20.0),
            EffectKind::Binary => n(40.0),
            EffectKind::Cascade => n(20.0),
            EffectKind::Square => 4 * n(12.0),
            EffectKind::Diamond => 4 * n(10.0),
            EffectKind::Cube | EffectKind::Octahedron => 0,
        }
    }

    /// Identifier used in config files and logs.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Explosion => "explosion",
            EffectKind::Waterfall => "waterfall",
            EffectKind::Crack => "crack",
            EffectKind::Star => "star",
            EffectKind::Fizzle => "fizzle",
            EffectKind::MatrixRain => "matrix_rain",
            EffectKind::Glitch => "glitch",
            EffectKind::Binary => "binary",
            EffectKind::Cascade => "cascade",
            EffectKind::Square => "square",
            EffectKind::Diamond => "diamond",
            EffectKind::Cube => "cube",
            EffectKind::Octahedron => "octahedron",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured click effect: a fixed kind, or `random`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickEffect {
    /// Pick a kind from [`EffectKind::RANDOM_POOL`] on every trigger.
    #[default]
    Random,
    #[serde(untagged)]
    Kind(EffectKind),
}

impl ClickEffect {
    /// Storms pick one of these for their whole duration.
    pub fn storm_choices() -> impl Iterator<Item = ClickEffect> {
        EffectKind::RANDOM_POOL
            .into_iter()
            .map(ClickEffect::Kind)
            .chain(std::iter::once(ClickEffect::Random))
    }

    /// Resolve `random` to a concrete kind; fixed kinds pass through.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> EffectKind {
        match self {
            ClickEffect::Kind(kind) => kind,
            ClickEffect::Random => {
                EffectKind::RANDOM_POOL[rng.gen_range(0..EffectKind::RANDOM_POOL.len())]
            }
        }
    }
}

impl From<EffectKind> for ClickEffect {
    fn from(kind: EffectKind) -> Self {
        ClickEffect::Kind(kind)
    }
}

impl std::fmt::Display for ClickEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClickEffect::Random => f.write_str("random"),
            ClickEffect::Kind(kind) => kind.fmt(f),
        }
    }
}

// ============================================================================
// Generators
// ============================================================================

const WATERFALL_WIDTH: f32 = 200.0;

fn waterfall_columns(font_size: f32) -> usize {
    if font_size <= 0.0 {
        return 0;
    }
    scaled_count(WATERFALL_WIDTH / font_size, 1.0)
}

fn spawn_explosion(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(20.0);
    let life = ctx.life(30.0);
    let batch = (0..count)
        .map(|i| {
            let angle = SpawnContext::spoke_angle(i, count);
            let speed = ctx.random_range(3.0, 6.0);
            let glyph = Glyph::Char(ctx.random_letter());
            Particle::new(ctx.origin, SpawnContext::direction(angle) * speed, glyph, life)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_waterfall(ctx: &mut SpawnContext) -> Spawned {
    let base_life = ctx.life(80.0);
    let columns = waterfall_columns(ctx.font_size);
    let rows = ctx.count(15.0);
    let left = ctx.origin.x - WATERFALL_WIDTH / 2.0;

    let mut batch = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        // Later rows start lower and die sooner.
        let delay = row as i32 * 2;
        for col in 0..columns {
            let position = Vec2::new(left + col as f32 * ctx.font_size, ctx.origin.y + delay as f32);
            let velocity = Vec2::new(0.0, ctx.random_range(2.0, 3.0));
            let glow = ctx.chance(0.1);
            batch.push(
                Particle::new(position, velocity, Glyph::Waterfall, base_life)
                    .with_life(base_life - delay)
                    .with_glow(glow),
            );
        }
    }
    Spawned::Particles(batch)
}

fn spawn_crack(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(12.0);
    let life = ctx.life(40.0);
    let batch = (0..count)
        .map(|i| {
            let angle = SpawnContext::spoke_angle(i, count);
            let distance = ctx.random_range(20.0, 40.0);
            let position = ctx.origin + SpawnContext::direction(angle) * distance;
            let glyph = Glyph::Char(ctx.random_letter());
            Particle::new(position, Vec2::ZERO, glyph, life).with_glow(true)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_star(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(8.0);
    let life = ctx.life(50.0);
    let batch = (0..count)
        .map(|i| {
            let angle = SpawnContext::spoke_angle(i, count);
            let glyph = Glyph::Char(ctx.random_letter());
            Particle::new(ctx.origin, SpawnContext::direction(angle) * 2.0, glyph, life)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_fizzle(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(25.0);
    let max_life = ctx.life(60.0);
    let batch = (0..count)
        .map(|_| {
            let angle = ctx.random_angle();
            let speed = ctx.random_range(1.0, 4.0);
            let base = ctx.random_range(30.0, 60.0);
            let life = ctx.life(base);
            Particle::new(ctx.origin, SpawnContext::direction(angle) * speed, Glyph::Fizzle, max_life)
                .with_life(life)
                .with_angle(angle)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_matrix_rain(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(30.0);
    let max_life = ctx.life(80.0);
    let batch = (0..count)
        .map(|_| {
            let jitter = ctx.jitter(50.0);
            let column = ctx.snap_down(ctx.origin.x + jitter);
            let y = ctx.origin.y - ctx.random_range(0.0, 100.0);
            let velocity = Vec2::new(0.0, ctx.random_range(2.0, 4.0));
            let base = ctx.random_range(40.0, 80.0);
            let life = ctx.life(base);
            let glyph = Glyph::Char(ctx.random_letter());
            let glow = ctx.chance(0.3);
            Particle::new(Vec2::new(column, y), velocity, glyph, max_life)
                .with_life(life)
                .with_glow(glow)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_glitch(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(20.0);
    let max_life = ctx.life(40.0);
    let batch = (0..count)
        .map(|_| {
            let offset = Vec2::new(ctx.jitter(50.0), ctx.jitter(25.0));
            let velocity = Vec2::new(ctx.jitter(1.0), ctx.jitter(1.0));
            let base = ctx.random_range(10.0, 40.0);
            let life = ctx.life(base);
            let scale = ctx.random_range(0.5, 2.0);
            Particle::new(ctx.origin + offset, velocity, Glyph::Glitch, max_life)
                .with_life(life)
                .with_scale(scale)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_binary(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(40.0);
    let max_life = ctx.life(60.0);
    let batch = (0..count)
        .map(|_| {
            let angle = ctx.random_angle();
            let speed = ctx.random_range(1.0, 5.0);
            let base = ctx.random_range(30.0, 60.0);
            let life = ctx.life(base);
            Particle::new(ctx.origin, SpawnContext::direction(angle) * speed, Glyph::Binary, max_life)
                .with_life(life)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_cascade(ctx: &mut SpawnContext) -> Spawned {
    let count = ctx.count(20.0);
    let life = ctx.life(80.0);
    let batch = (0..count)
        .map(|_| {
            let offset = Vec2::new(ctx.jitter(25.0), -ctx.random_range(0.0, 30.0));
            let position = ctx.origin + offset;
            let velocity = Vec2::new(ctx.jitter(1.5), ctx.random_range(-10.0, -5.0));
            Particle::new(position, velocity, Glyph::Cascade, life)
        })
        .collect();
    Spawned::Particles(batch)
}

/// Points marching around an outline, one side after another.
///
/// `corner(side, t)` gives the position at fraction `t` along `side` and the
/// velocity shared by that side.
fn outline<F>(ctx: &mut SpawnContext, per_side: usize, life: i32, glow: bool, corner: F) -> Spawned
where
    F: Fn(usize, f32) -> (Vec2, Vec2),
{
    let batch = (0..per_side * 4)
        .map(|i| {
            let side = i / per_side;
            let t = (i % per_side) as f32 / per_side as f32;
            let (offset, velocity) = corner(side, t);
            let glyph = Glyph::Char(ctx.random_letter());
            Particle::new(ctx.origin + offset, velocity, glyph, life).with_glow(glow)
        })
        .collect();
    Spawned::Particles(batch)
}

fn spawn_square(ctx: &mut SpawnContext) -> Spawned {
    const SIZE: f32 = 100.0;
    let per_side = ctx.count(12.0);
    let life = ctx.life(40.0);
    outline(ctx, per_side, life, false, |side, t| match side {
        // top
        0 => (Vec2::new(-SIZE + t * SIZE * 2.0, -SIZE), Vec2::new(0.0, -2.0)),
        // right
        1 => (Vec2::new(SIZE, -SIZE + t * SIZE * 2.0), Vec2::new(2.0, 0.0)),
        // bottom
        2 => (Vec2::new(SIZE - t * SIZE * 2.0, SIZE), Vec2::new(0.0, 2.0)),
        // left
        _ => (Vec2::new(-SIZE, SIZE - t * SIZE * 2.0), Vec2::new(-2.0, 0.0)),
    })
}

fn spawn_diamond(ctx: &mut SpawnContext) -> Spawned {
    const SIZE: f32 = 80.0;
    const V: f32 = 1.4;
    let per_side = ctx.count(10.0);
    let life = ctx.life(40.0);
    outline(ctx, per_side, life, true, |side, t| match side {
        // top-right
        0 => (Vec2::new(t * SIZE, -t * SIZE), Vec2::new(V, -V)),
        // right-bottom
        1 => (Vec2::new(SIZE - t * SIZE, -SIZE + t * SIZE * 2.0), Vec2::new(V, V)),
        // bottom-left
        2 => (Vec2::new(SIZE - t * SIZE * 2.0, SIZE - t * SIZE), Vec2::new(-V, V)),
        // left-top
        _ => (Vec2::new(-SIZE + t * SIZE, SIZE - t * SIZE * 2.0), Vec2::new(-V, -V)),
    })
}

fn spawn_cube(ctx: &mut SpawnContext) -> Spawned {
    Spawned::Shape(Shape3D::cube(ctx.origin, ctx.life(50.0)))
}

fn spawn_octahedron(ctx: &mut SpawnContext) -> Spawned {
    Spawned::Shape(Shape3D::octahedron(ctx.origin, ctx.life(50.0)))
}
