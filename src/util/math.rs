//! Math type re-exports and the axis-aligned bounds used for mesh records.
//!
//! Host-side geometry is kept in double precision (`DVec3`) until it is
//! encoded; only the GPU records narrow to `f32`.

pub use glam::{DVec2, DVec3, UVec2, Vec3};

use std::fmt;

/// Axis-aligned bounding box in double precision.
#[derive(Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds3 {
    /// Empty bounds (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// All-zero bounds, as used by the reserved dummy mesh.
    pub const ZERO: Self = Self { min: DVec3::ZERO, max: DVec3::ZERO };

    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set. Empty input yields [`Bounds3::EMPTY`].
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_by_point(p);
        }
        b
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn expand_by_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn expand_by_bounds(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        self.size() * 0.5
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Bounds usable in a mesh record: an empty box collapses to zero.
    pub fn or_zero(self) -> Self {
        if self.is_empty() { Self::ZERO } else { self }
    }
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Bounds3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounds3({:?} - {:?})", self.min, self.max)
    }
}

/// Narrow a host vector to the `f32` triple stored in GPU records.
#[inline]
pub fn to_f32_array(v: DVec3) -> [f32; 3] {
    v.as_vec3().to_array()
}
