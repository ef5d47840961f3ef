//! Geometry ingestion: mesh text parsing and object-to-world placement.
//!
//! ```text
//! mesh text -> parse_mesh -> object-space triangles -> Transform::place -> PlacedMesh
//! ```

mod obj;
mod transform;

pub use obj::parse_mesh;
pub use transform::{rotate_euler_xyz, triangle_bounds, PlacedMesh, Transform};

use crate::util::DVec3;

/// One triangle with per-vertex normals.
///
/// Object space straight out of the loader, world space after
/// [`Transform::place`]. A normal is the zero vector when the source face
/// gave none.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub pos_a: DVec3,
    pub pos_b: DVec3,
    pub pos_c: DVec3,
    pub normal_a: DVec3,
    pub normal_b: DVec3,
    pub normal_c: DVec3,
}

impl Triangle {
    pub fn positions(&self) -> [DVec3; 3] {
        [self.pos_a, self.pos_b, self.pos_c]
    }

    pub fn normals(&self) -> [DVec3; 3] {
        [self.normal_a, self.normal_b, self.normal_c]
    }
}
