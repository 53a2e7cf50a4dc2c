//! SDF-based contact queries
//!
//! Every static shape in the world exposes a signed distance; the contact
//! normal is the SDF gradient.

use glam::Vec2;

use crate::rotate;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a rotated rectangle
///
/// `half` is the half-extent, `angle` the rotation in radians about `center`.
pub fn sd_box(p: Vec2, center: Vec2, half: Vec2, angle: f32) -> f32 {
    let local = rotate(p - center, -angle);
    let q = local.abs() - half;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Compute SDF gradient (surface normal) using central differences
pub fn sdf_gradient<F>(p: Vec2, sdf: F) -> Vec2
where
    F: Fn(Vec2) -> f32,
{
    let eps = 0.5;
    let dx = sdf(p + Vec2::new(eps, 0.0)) - sdf(p - Vec2::new(eps, 0.0));
    let dy = sdf(p + Vec2::new(0.0, eps)) - sdf(p - Vec2::new(0.0, eps));
    Vec2::new(dx, dy).normalize_or_zero()
}

/// Result of SDF collision check
#[derive(Debug, Clone)]
pub struct SdfCollision {
    pub hit: bool,
    pub distance: f32,
    pub normal: Vec2,
    pub penetration: f32,
}

impl SdfCollision {
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: f32::MAX,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between ball and an SDF shape
pub fn check_sdf_collision<F>(ball_pos: Vec2, ball_radius: f32, sdf: F) -> SdfCollision
where
    F: Fn(Vec2) -> f32,
{
    let dist = sdf(ball_pos);

    if dist < ball_radius {
        let normal = sdf_gradient(ball_pos, &sdf);
        SdfCollision {
            hit: true,
            distance: dist,
            normal,
            penetration: ball_radius - dist,
        }
    } else {
        SdfCollision::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sd_box_axis_aligned() {
        let half = Vec2::new(50.0, 10.0);
        // Above the top face
        assert!((sd_box(Vec2::new(0.0, -30.0), Vec2::ZERO, half, 0.0) - 20.0).abs() < 1e-4);
        // Inside: negative
        assert!(sd_box(Vec2::ZERO, Vec2::ZERO, half, 0.0) < 0.0);
    }

    #[test]
    fn test_sd_box_rotated() {
        // A 100x20 bar rotated 90° is tall and thin
        let half = Vec2::new(50.0, 10.0);
        let d = sd_box(Vec2::new(0.0, -45.0), Vec2::ZERO, half, FRAC_PI_2);
        assert!(d < 0.0, "point should be inside the rotated bar, got {d}");
        let d = sd_box(Vec2::new(30.0, 0.0), Vec2::ZERO, half, FRAC_PI_2);
        assert!((d - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_gradient_points_away_from_surface() {
        let half = Vec2::new(400.0, 20.0);
        let center = Vec2::new(400.0, 580.0);
        let n = sdf_gradient(Vec2::new(300.0, 550.0), |p| sd_box(p, center, half, 0.0));
        assert!((n - Vec2::new(0.0, -1.0)).length() < 1e-3);
    }

    #[test]
    fn test_check_collision_circle() {
        let hit = check_sdf_collision(Vec2::new(25.0, 0.0), 10.0, |p| {
            sd_circle(p, Vec2::ZERO, 20.0)
        });
        assert!(hit.hit);
        assert!((hit.penetration - 5.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::X).length() < 1e-3);
    }
}
