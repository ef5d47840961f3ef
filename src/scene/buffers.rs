//! Append-only scene arrays in the GPU record layout.
//!
//! Three independent record arrays, one per primitive kind. Each `add_*`
//! appends exactly one record and returns its logical index (slot count
//! divided by stride). A mesh's triangle range always refers to absolute
//! positions in the shared triangle array; nothing is ever compacted.

use gpu_layout::{GpuMesh, GpuRecord, GpuSphere, GpuTriangle, RecordArray};
use serde::{Deserialize, Serialize};

use crate::geom::{PlacedMesh, Triangle};
use crate::material::{Material, Rgb};
use crate::util::{to_f32_array, Bounds3, DVec3, Error, Result};

pub type TriangleArray = RecordArray<GpuTriangle>;
pub type MeshArray = RecordArray<GpuMesh>;
pub type SphereArray = RecordArray<GpuSphere>;

/// A triangle range with bounds and surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub first_triangle: u32,
    pub triangle_count: u32,
    pub bounds: Bounds3,
    pub material: Material,
}

/// Analytic sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
    #[serde(default)]
    pub material: Material,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64, material: Material) -> Self {
        Self { center, radius, material }
    }

    /// The radius must be a positive number.
    pub fn validate(&self) -> Result<()> {
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(Error::config(format!("sphere radius must be > 0, got {}", self.radius)));
        }
        self.material.validate()
    }
}

/// Where one appended asset landed in the scene arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    pub mesh_index: u32,
    pub first_triangle: u32,
    pub triangle_count: u32,
}

impl MeshHandle {
    /// Triangle indices covered by this mesh.
    pub fn triangle_range(&self) -> std::ops::Range<u32> {
        self.first_triangle..self.first_triangle + self.triangle_count
    }
}

pub fn encode_triangle(t: &Triangle) -> GpuTriangle {
    GpuTriangle {
        pos_a: to_f32_array(t.pos_a),
        pos_b: to_f32_array(t.pos_b),
        pos_c: to_f32_array(t.pos_c),
        normal_a: to_f32_array(t.normal_a),
        normal_b: to_f32_array(t.normal_b),
        normal_c: to_f32_array(t.normal_c),
        ..Default::default()
    }
}

pub fn decode_triangle(r: &GpuTriangle) -> Triangle {
    Triangle {
        pos_a: vec3_from(r.pos_a),
        pos_b: vec3_from(r.pos_b),
        pos_c: vec3_from(r.pos_c),
        normal_a: vec3_from(r.normal_a),
        normal_b: vec3_from(r.normal_b),
        normal_c: vec3_from(r.normal_c),
    }
}

pub fn encode_mesh(m: &Mesh) -> GpuMesh {
    GpuMesh {
        first_triangle: m.first_triangle as f32,
        triangle_count: m.triangle_count as f32,
        bound_min: to_f32_array(m.bounds.min),
        bound_max: to_f32_array(m.bounds.max),
        color: m.material.color.to_f32_array(),
        emission_color: m.material.emission_color.to_f32_array(),
        emission_strength: m.material.emission_strength as f32,
        smoothness: m.material.smoothness as f32,
        ..Default::default()
    }
}

/// Inverse of [`encode_mesh`]. Specular fields are not part of the record
/// and come back as defaults.
pub fn decode_mesh(r: &GpuMesh) -> Mesh {
    Mesh {
        first_triangle: r.first_triangle as u32,
        triangle_count: r.triangle_count as u32,
        bounds: Bounds3::new(vec3_from(r.bound_min), vec3_from(r.bound_max)),
        material: material_from(r.color, r.emission_color, r.emission_strength, r.smoothness),
    }
}

pub fn encode_sphere(s: &Sphere) -> GpuSphere {
    GpuSphere {
        center: to_f32_array(s.center),
        radius: s.radius as f32,
        color: s.material.color.to_f32_array(),
        emission_color: s.material.emission_color.to_f32_array(),
        emission_strength: s.material.emission_strength as f32,
        smoothness: s.material.smoothness as f32,
        ..Default::default()
    }
}

pub fn decode_sphere(r: &GpuSphere) -> Sphere {
    Sphere {
        center: vec3_from(r.center),
        radius: f64::from(r.radius),
        material: material_from(r.color, r.emission_color, r.emission_strength, r.smoothness),
    }
}

fn vec3_from(a: [f32; 3]) -> DVec3 {
    glam::Vec3::from_array(a).as_dvec3()
}

fn rgb_from(a: [f32; 3]) -> Rgb {
    Rgb::new(f64::from(a[0]), f64::from(a[1]), f64::from(a[2]))
}

fn material_from(color: [f32; 3], emission: [f32; 3], strength: f32, smoothness: f32) -> Material {
    Material {
        color: rgb_from(color),
        emission_color: rgb_from(emission),
        emission_strength: f64::from(strength),
        smoothness: f64::from(smoothness),
        ..Material::default()
    }
}

/// The three scene arrays handed to the GPU backend.
///
/// Index 0 of every array is a reserved all-zero record so that no array is
/// ever empty, even for a scene with no real geometry.
#[derive(Debug, Clone)]
pub struct SceneBuffers {
    triangles: TriangleArray,
    meshes: MeshArray,
    spheres: SphereArray,
    /// Bumped on every append; lets the renderer know when to re-upload.
    revision: u64,
}

impl Default for SceneBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuffers {
    pub fn new() -> Self {
        let mut triangles = TriangleArray::new();
        let mut meshes = MeshArray::new();
        let mut spheres = SphereArray::new();
        triangles.push(GpuTriangle::default());
        meshes.push(GpuMesh::default());
        spheres.push(GpuSphere::default());
        Self { triangles, meshes, spheres, revision: 0 }
    }

    pub fn add_triangle(&mut self, triangle: &Triangle) -> u32 {
        self.revision += 1;
        self.triangles.push(encode_triangle(triangle))
    }

    /// Append a mesh record.
    ///
    /// # Panics
    ///
    /// If the triangle range does not fit the triangle array. Ranges are only
    /// produced by [`append_asset`](Self::append_asset), so this is a builder
    /// bug rather than a data problem.
    pub fn add_mesh(&mut self, mesh: &Mesh) -> u32 {
        let end = u64::from(mesh.first_triangle) + u64::from(mesh.triangle_count);
        assert!(
            end <= self.triangles.len() as u64,
            "mesh range {}..{} exceeds {} triangle records",
            mesh.first_triangle,
            end,
            self.triangles.len()
        );
        self.revision += 1;
        self.meshes.push(encode_mesh(mesh))
    }

    /// Append a sphere. The radius must be positive.
    pub fn add_sphere(&mut self, sphere: &Sphere) -> Result<u32> {
        sphere.validate()?;
        self.revision += 1;
        Ok(self.spheres.push(encode_sphere(sphere)))
    }

    /// Append the triangles of one placed asset followed by the mesh record
    /// that covers exactly them.
    pub fn append_asset(&mut self, placed: &PlacedMesh, material: &Material) -> MeshHandle {
        let records: Vec<GpuTriangle> = placed.triangles.iter().map(encode_triangle).collect();
        let first_triangle = self.triangles.extend_from_slice(&records);
        let triangle_count = records.len() as u32;
        self.revision += 1;
        let mesh_index = self.add_mesh(&Mesh {
            first_triangle,
            triangle_count,
            bounds: placed.bounds.or_zero(),
            material: *material,
        });
        tracing::debug!(mesh_index, first_triangle, triangle_count, "appended asset");
        MeshHandle { mesh_index, first_triangle, triangle_count }
    }

    pub fn triangles(&self) -> &TriangleArray {
        &self.triangles
    }

    pub fn meshes(&self) -> &MeshArray {
        &self.meshes
    }

    pub fn spheres(&self) -> &SphereArray {
        &self.spheres
    }

    pub fn mesh(&self, index: u32) -> Option<Mesh> {
        self.meshes.get(index).map(decode_mesh)
    }

    pub fn triangle(&self, index: u32) -> Option<Triangle> {
        self.triangles.get(index).map(decode_triangle)
    }

    pub fn sphere(&self, index: u32) -> Option<Sphere> {
        self.spheres.get(index).map(decode_sphere)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total slot counts per array, in the order triangles, meshes, spheres.
    pub fn slot_counts(&self) -> [usize; 3] {
        [
            self.triangles.len() * GpuTriangle::STRIDE,
            self.meshes.len() * GpuMesh::STRIDE,
            self.spheres.len() * GpuSphere::STRIDE,
        ]
    }
}
