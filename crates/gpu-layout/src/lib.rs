//! GPU-side record layouts for the progressive path tracer.
//!
//! Every type in this crate is `#[repr(C)]` plain-old-data and is uploaded
//! verbatim into a storage or uniform buffer. The compute shader declares the
//! matching WGSL structs, so field order, padding slots and sizes are a byte
//! contract: change them only together with the shader.
//!
//! ## Scene storage records
//! ```text
//! GpuTriangle  24 x f32   posA+pad posB+pad posC+pad nA+pad nB+pad nC+pad
//! GpuMesh      24 x f32   first count pad pad | min+pad | max+pad | color+pad
//!                         | emission+strength | smoothness pad pad pad
//! GpuSphere    20 x f32   center+radius | color+pad | emission+strength
//!                         | smoothness + 7 pad
//! ```
//!
//! ## Per-tick uniform blocks
//! `CameraBlock` (8 x f32), `SkyBlock` (18 x f32), `RenderConfigBlock`
//! (4 x u32) and `FrameInfoBlock` (4 x u32).

use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

/// Size of one scalar slot in bytes.
pub const SLOT_BYTES: usize = 4;

/// A fixed-stride record stored in a flat `f32` scene array.
pub trait GpuRecord: Pod {
    /// Number of 4-byte scalar slots one record occupies.
    const STRIDE: usize;
    /// Human readable kind, used in logs.
    const KIND: &'static str;
}

/// Triangle record (96 bytes). World-space positions and unit normals, each
/// padded to a vec4.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub pos_a: [f32; 3],
    pub _pad0: f32,
    pub pos_b: [f32; 3],
    pub _pad1: f32,
    pub pos_c: [f32; 3],
    pub _pad2: f32,
    pub normal_a: [f32; 3],
    pub _pad3: f32,
    pub normal_b: [f32; 3],
    pub _pad4: f32,
    pub normal_c: [f32; 3],
    pub _pad5: f32,
}

/// Mesh record (96 bytes).
///
/// The triangle range is stored as floats because the whole scene array is a
/// `array<f32>` on the shader side. Values up to 2^24 are exact.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuMesh {
    pub first_triangle: f32,
    pub triangle_count: f32,
    pub _pad0: [f32; 2],
    pub bound_min: [f32; 3],
    pub _pad1: f32,
    pub bound_max: [f32; 3],
    pub _pad2: f32,
    pub color: [f32; 3],
    pub _pad3: f32,
    pub emission_color: [f32; 3],
    pub emission_strength: f32,
    pub smoothness: f32,
    pub _pad4: [f32; 3],
}

/// Sphere record (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuSphere {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub _pad0: f32,
    pub emission_color: [f32; 3],
    pub emission_strength: f32,
    pub smoothness: f32,
    pub _pad1: [f32; 7],
}

impl GpuRecord for GpuTriangle {
    const STRIDE: usize = 24;
    const KIND: &'static str = "triangle";
}

impl GpuRecord for GpuMesh {
    const STRIDE: usize = 24;
    const KIND: &'static str = "mesh";
}

impl GpuRecord for GpuSphere {
    const STRIDE: usize = 20;
    const KIND: &'static str = "sphere";
}

/// Camera uniform (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraBlock {
    pub position: [f32; 3],
    pub pitch: f32,
    pub yaw: f32,
    pub plane_distance: f32,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub _pad: f32,
}

/// Sky uniform (72 bytes).
///
/// `sun_direction` is the lifted unit vector, not the compressed settings form.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SkyBlock {
    pub horizon_color: [f32; 3],
    pub _pad0: f32,
    pub zenith_color: [f32; 3],
    pub _pad1: f32,
    pub ground_color: [f32; 3],
    pub _pad2: f32,
    pub sun_direction: [f32; 3],
    pub sun_focus: f32,
    pub sun_intensity: f32,
    /// 1.0 when the sky is disabled, 0.0 otherwise.
    pub disabled: f32,
}

/// Render configuration uniform (16 bytes).
///
/// All four words are unsigned integers, including the two strengths; the
/// shader scales them itself.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RenderConfigBlock {
    pub max_bounce_count: u32,
    pub samples_per_pixel: u32,
    pub diverge_strength: u32,
    pub defocus_strength: u32,
}

/// Frame info uniform (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct FrameInfoBlock {
    pub frame_count: u32,
    /// 1 while accumulating, 0 in preview.
    pub accumulating: u32,
    pub width: u32,
    pub height: u32,
}

const _: () = assert!(size_of::<GpuTriangle>() == GpuTriangle::STRIDE * SLOT_BYTES);
const _: () = assert!(size_of::<GpuMesh>() == GpuMesh::STRIDE * SLOT_BYTES);
const _: () = assert!(size_of::<GpuSphere>() == GpuSphere::STRIDE * SLOT_BYTES);
const _: () = assert!(size_of::<CameraBlock>() == 8 * SLOT_BYTES);
const _: () = assert!(size_of::<SkyBlock>() == 18 * SLOT_BYTES);
const _: () = assert!(size_of::<RenderConfigBlock>() == 4 * SLOT_BYTES);
const _: () = assert!(size_of::<FrameInfoBlock>() == 4 * SLOT_BYTES);

/// Append-only array of fixed-stride records.
///
/// Records are never reordered or rewritten once pushed; the index returned by
/// [`push`](Self::push) stays valid for the lifetime of the array.
#[derive(Clone)]
pub struct RecordArray<T: GpuRecord> {
    records: Vec<T>,
}

impl<T: GpuRecord> RecordArray<T> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Append one record and return its logical index.
    pub fn push(&mut self, record: T) -> u32 {
        let index = self.records.len() as u32;
        self.records.push(record);
        index
    }

    /// Append records in order, returning the index of the first one.
    pub fn extend_from_slice(&mut self, records: &[T]) -> u32 {
        let index = self.records.len() as u32;
        self.records.extend_from_slice(records);
        index
    }

    /// Number of records (not slots).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.records.get(index as usize)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The array as flat `f32` slots, `len() * T::STRIDE` long.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    /// Raw bytes for buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

impl<T: GpuRecord> Default for RecordArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GpuRecord + std::fmt::Debug> std::fmt::Debug for RecordArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecordArray<{}>({} records)", T::KIND, self.records.len())
    }
}
