//! Scene construction and the flat GPU scene arrays.
//!
//! - [`SceneBuffers`] - append-only triangle, mesh and sphere records
//! - [`SceneBuilder`] - loads named assets and appends them atomically
//! - [`RoomDesc`] - six-walled room with an optional ceiling light
//! - [`SceneDesc`] - JSON description of a whole scene

mod assets;
mod buffers;
mod builder;
mod desc;
mod room;

pub use assets::{load_asset, load_assets, AssetSource, FsAssets, MemoryAssets};
pub use buffers::{
    decode_mesh, decode_sphere, decode_triangle, encode_mesh, encode_sphere, encode_triangle, Mesh,
    MeshArray, MeshHandle, SceneBuffers, Sphere, SphereArray, TriangleArray,
};
pub use builder::{BuildReport, SceneBuilder};
pub use desc::{ModelDesc, SceneDesc};
pub use room::{LightPatch, RoomDesc, RoomMaterials, Wall, DEFAULT_CUBE_ASSET};
