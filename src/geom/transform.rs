//! Scale, Euler rotation and translation of triangle sets.
//!
//! Vertices go scale -> rotate (X, then Y, then Z; right-handed, radians) ->
//! translate. Normals only see the rotation and are renormalized afterwards.
//! Everything here is pure; identical input gives bit-identical output.

use serde::{Deserialize, Serialize};

use super::Triangle;
use crate::util::{Bounds3, DVec3};

/// Placement of an object-space asset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub scale: DVec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: DVec3,
    pub translation: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World-space triangles plus their bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMesh {
    pub triangles: Vec<Triangle>,
    pub bounds: Bounds3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: DVec3::ONE,
        rotation: DVec3::ZERO,
        translation: DVec3::ZERO,
    };

    pub fn new(scale: DVec3, rotation: DVec3, translation: DVec3) -> Self {
        Self { scale, rotation, translation }
    }

    #[inline]
    pub fn apply_point(&self, p: DVec3) -> DVec3 {
        rotate_euler_xyz(p * self.scale, self.rotation) + self.translation
    }

    /// Rotate a normal and renormalize it. A zero normal stays zero.
    #[inline]
    pub fn apply_normal(&self, n: DVec3) -> DVec3 {
        rotate_euler_xyz(n, self.rotation).normalize_or_zero()
    }

    pub fn apply_triangle(&self, tri: &Triangle) -> Triangle {
        Triangle {
            pos_a: self.apply_point(tri.pos_a),
            pos_b: self.apply_point(tri.pos_b),
            pos_c: self.apply_point(tri.pos_c),
            normal_a: self.apply_normal(tri.normal_a),
            normal_b: self.apply_normal(tri.normal_b),
            normal_c: self.apply_normal(tri.normal_c),
        }
    }

    /// Transform every triangle and compute the bounds of the result.
    pub fn place(&self, triangles: &[Triangle]) -> PlacedMesh {
        let triangles: Vec<Triangle> = triangles.iter().map(|t| self.apply_triangle(t)).collect();
        let bounds = triangle_bounds(&triangles);
        PlacedMesh { triangles, bounds }
    }
}

/// Rotate about X, then Y, then Z.
pub fn rotate_euler_xyz(v: DVec3, rotation: DVec3) -> DVec3 {
    let (sx, cx) = rotation.x.sin_cos();
    let p = DVec3::new(v.x, v.y * cx - v.z * sx, v.y * sx + v.z * cx);

    let (sy, cy) = rotation.y.sin_cos();
    let p = DVec3::new(p.x * cy + p.z * sy, p.y, -p.x * sy + p.z * cy);

    let (sz, cz) = rotation.z.sin_cos();
    DVec3::new(p.x * cz - p.y * sz, p.x * sz + p.y * cz, p.z)
}

/// Componentwise min/max over all vertices. Empty input gives
/// [`Bounds3::EMPTY`].
pub fn triangle_bounds(triangles: &[Triangle]) -> Bounds3 {
    Bounds3::from_points(triangles.iter().flat_map(Triangle::positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn sample_triangle() -> Triangle {
        Triangle {
            pos_a: DVec3::new(0.5, -0.25, 3.0),
            pos_b: DVec3::new(-1.0, 2.0, 0.0),
            pos_c: DVec3::new(0.0, 0.0, -7.5),
            normal_a: DVec3::new(0.0, 0.0, 1.0),
            normal_b: DVec3::Y,
            normal_c: DVec3::new(-1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_identity() {
        let tri = sample_triangle();
        let placed = Transform::IDENTITY.place(&[tri]);
        assert_eq!(placed.triangles[0], tri);
    }

    #[test]
    fn test_rotated_normals_stay_unit() {
        let angles = [0.0, 0.3, FRAC_PI_2, 1.7, PI, -2.4, 5.9];
        let n = DVec3::new(0.6, 0.8, 0.0);
        for &x in &angles {
            for &y in &angles {
                for &z in &angles {
                    let xf = Transform::new(DVec3::new(3.0, 0.1, 1.0), DVec3::new(x, y, z), DVec3::ONE);
                    let out = xf.apply_normal(n);
                    assert!((out.length() - 1.0).abs() < EPS, "{x} {y} {z}: {out:?}");
                }
            }
        }
    }

    #[test]
    fn test_rotation_order_x_then_y() {
        // +Y about X by 90 lands on +Z, then +Z about Y by 90 lands on +X.
        let v = rotate_euler_xyz(DVec3::Y, DVec3::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        assert!((v - DVec3::X).length() < EPS, "{v:?}");
    }

    #[test]
    fn test_scale_ignored_by_normals() {
        let xf = Transform::new(DVec3::new(5.0, 0.5, 2.0), DVec3::ZERO, DVec3::new(9.0, 9.0, 9.0));
        assert_eq!(xf.apply_normal(DVec3::Y), DVec3::Y);
        assert_eq!(xf.apply_normal(DVec3::ZERO), DVec3::ZERO);
        assert_eq!(xf.apply_point(DVec3::ONE), DVec3::new(14.0, 9.5, 11.0));
    }

    #[test]
    fn test_bounds_cover_vertices() {
        let xf = Transform::new(DVec3::new(2.0, 1.0, 0.5), DVec3::new(0.4, -1.1, 2.0), DVec3::new(1.0, -3.0, 0.0));
        let placed = xf.place(&[sample_triangle(), Triangle::default()]);
        let b = placed.bounds;
        assert!(b.min.cmple(b.max).all());
        for t in &placed.triangles {
            for p in t.positions() {
                assert!(b.contains_point(p), "{p:?} outside {b:?}");
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let xf = Transform::new(DVec3::splat(1.3), DVec3::new(0.1, 0.2, 0.3), DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(xf.place(&[sample_triangle()]), xf.place(&[sample_triangle()]));
    }
}
