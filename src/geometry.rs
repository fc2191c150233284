//! 3D rotation and perspective projection for wireframe shapes.

use glam::{Vec2, Vec3};

/// Distance of the virtual eye from the projection plane.
pub const CAMERA_DISTANCE: f32 = 200.0;

/// A vertex projected onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen-space position.
    pub position: Vec2,
    /// Perspective scale factor (`CAMERA_DISTANCE / (CAMERA_DISTANCE + z)`).
    pub scale: f32,
}

/// Rotate `point` about X, then Y, then Z by the angles in `rotation` (radians).
pub fn rotate(point: Vec3, rotation: Vec3) -> Vec3 {
    let (sx, cx) = rotation.x.sin_cos();
    let (sy, cy) = rotation.y.sin_cos();
    let (sz, cz) = rotation.z.sin_cos();

    // X axis
    let y = point.y * cx - point.z * sx;
    let z = point.y * sx + point.z * cx;

    // Y axis
    let x = point.x * cy + z * sy;
    let z = -point.x * sy + z * cy;

    // Z axis
    Vec3::new(x * cz - y * sz, x * sz + y * cz, z)
}

/// Rotate `point` and project it with a fixed-distance perspective divide,
/// offset by the screen-space `center`.
///
/// Returns `None` when the point sits at or behind the eye, where the
/// divide would blow up or flip the image.
pub fn project(point: Vec3, center: Vec2, rotation: Vec3) -> Option<Projected> {
    let rotated = rotate(point, rotation);
    let depth = CAMERA_DISTANCE + rotated.z;
    if depth <= f32::EPSILON {
        return None;
    }
    let scale = CAMERA_DISTANCE / depth;
    let position = center + Vec2::new(rotated.x, rotated.y) * scale;
    if !position.is_finite() || !scale.is_finite() {
        return None;
    }
    Some(Projected { position, scale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(approx(rotate(p, Vec3::ZERO), p));
    }

    #[test]
    fn test_quarter_turns() {
        // About X: +Y goes to +Z
        assert!(approx(rotate(Vec3::Y, Vec3::new(FRAC_PI_2, 0.0, 0.0)), Vec3::Z));
        // About Y: +X goes to -Z
        assert!(approx(rotate(Vec3::X, Vec3::new(0.0, FRAC_PI_2, 0.0)), -Vec3::Z));
        // About Z: +X goes to +Y
        assert!(approx(rotate(Vec3::X, Vec3::new(0.0, 0.0, FRAC_PI_2)), Vec3::Y));
    }

    #[test]
    fn test_project_scale() {
        let p = project(Vec3::new(10.0, 0.0, 200.0), Vec2::new(100.0, 50.0), Vec3::ZERO)
            .unwrap();
        assert!((p.scale - 0.5).abs() < 1e-6);
        assert!((p.position - Vec2::new(105.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_project_behind_eye_is_rejected() {
        assert!(project(Vec3::new(0.0, 0.0, -200.0), Vec2::ZERO, Vec3::ZERO).is_none());
        assert!(project(Vec3::new(0.0, 0.0, -250.0), Vec2::ZERO, Vec3::ZERO).is_none());
    }
}
