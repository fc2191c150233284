//! Rotating wireframe solids.
//!
//! Shapes are stored as object-space line segments, the same layout a
//! wireframe mesh uses: each entry is one edge `(start, end)`. They spin in
//! place around the click point and are drawn as glyphs sampled along each
//! projected edge.

use glam::{Vec2, Vec3};

use crate::geometry::{project, Projected};

/// Half-extent of the spawned solids, in pixels.
pub const SHAPE_SIZE: f32 = 60.0;
/// Object-space depth the solids are pushed back by before rotating.
pub const SHAPE_DEPTH: f32 = 100.0;

/// A wireframe polyhedron anchored at a screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape3D {
    /// Edges as endpoint pairs in object space.
    pub edges: Vec<(Vec3, Vec3)>,
    /// Rotation about X, Y and Z in radians.
    pub rotation: Vec3,
    /// Screen-space anchor.
    pub center: Vec2,
    pub life: i32,
    pub max_life: i32,
}

impl Shape3D {
    pub fn new(edges: Vec<(Vec3, Vec3)>, center: Vec2, life: i32) -> Self {
        let life = life.max(0);
        Self {
            edges,
            rotation: Vec3::ZERO,
            center,
            life,
            max_life: life,
        }
    }

    /// Cube with 8 vertices and 12 edges.
    pub fn cube(center: Vec2, life: i32) -> Self {
        let s = SHAPE_SIZE;
        let near = SHAPE_DEPTH - s;
        let far = SHAPE_DEPTH + s;
        let v = [
            Vec3::new(-s, -s, near),
            Vec3::new(s, -s, near),
            Vec3::new(s, s, near),
            Vec3::new(-s, s, near),
            Vec3::new(-s, -s, far),
            Vec3::new(s, -s, far),
            Vec3::new(s, s, far),
            Vec3::new(-s, s, far),
        ];

        let edges = vec![
            // Front face
            (v[0], v[1]),
            (v[1], v[2]),
            (v[2], v[3]),
            (v[3], v[0]),
            // Back face
            (v[4], v[5]),
            (v[5], v[6]),
            (v[6], v[7]),
            (v[7], v[4]),
            // Connecting edges
            (v[0], v[4]),
            (v[1], v[5]),
            (v[2], v[6]),
            (v[3], v[7]),
        ];
        Self::new(edges, center, life)
    }

    /// Octahedron with 6 vertices and 12 edges.
    pub fn octahedron(center: Vec2, life: i32) -> Self {
        let s = SHAPE_SIZE;
        let d = SHAPE_DEPTH;
        let top = Vec3::new(0.0, -s, d);
        let right = Vec3::new(s, 0.0, d);
        let front = Vec3::new(0.0, 0.0, d + s);
        let left = Vec3::new(-s, 0.0, d);
        let back = Vec3::new(0.0, 0.0, d - s);
        let bottom = Vec3::new(0.0, s, d);

        let edges = vec![
            // Top pyramid
            (top, right),
            (top, front),
            (top, left),
            (top, back),
            // Bottom pyramid
            (bottom, right),
            (bottom, front),
            (bottom, left),
            (bottom, back),
            // Equator
            (right, front),
            (front, left),
            (left, back),
            (back, right),
        ];
        Self::new(edges, center, life)
    }

    /// Number of edge endpoints (always twice the edge count).
    pub fn point_count(&self) -> usize {
        self.edges.len() * 2
    }

    /// Spin by one tick at the given particle speed and age by one frame.
    pub fn advance(&mut self, speed: f32) {
        self.rotation += Vec3::new(0.02, 0.03, 0.01) * speed;
        self.life -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0
    }

    pub fn life_alpha(&self) -> f32 {
        if self.max_life <= 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    /// Project every edge. Edges with an endpoint behind the eye are skipped.
    pub fn projected_edges(&self) -> impl Iterator<Item = (Projected, Projected)> + '_ {
        self.edges.iter().filter_map(move |(a, b)| {
            let pa = project(*a, self.center, self.rotation)?;
            let pb = project(*b, self.center, self.rotation)?;
            Some((pa, pb))
        })
    }
}
