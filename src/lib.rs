//! # pathtrace-host
//!
//! Host side of a progressive GPU path tracer: turns mesh assets and scene
//! descriptions into the flat record arrays a compute shader consumes, and
//! drives the per-frame preview / accumulation loop against a pluggable
//! backend.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math re-exports, bounds
//! - [`geom`] - Mesh text loader and transform engine
//! - [`material`] - Colors and surface materials
//! - [`scene`] - Scene buffers, asset sources, scene and room builders
//! - [`render`] - Settings, camera, frame orchestrator, backend seam
//!
//! ## Example
//!
//! ```ignore
//! use pathtrace_host::prelude::*;
//!
//! let assets = FsAssets::new("data/meshes");
//! let desc = SceneDesc::load("data/scenes/room.json")?;
//! let mut builder = SceneBuilder::new(&assets);
//! builder.build_from_desc(&desc)?;
//!
//! let mut ctx = RendererContext::setup(Settings::default(), builder.into_buffers(), RecordingBackend::new())?;
//! ctx.tick(1.0 / 60.0, &InputState::default());
//! ```

pub mod util;
pub mod geom;
pub mod material;
pub mod scene;
pub mod render;

// Re-export commonly used types
pub use util::{Error, Result};

/// Layout records shared with the GPU side.
pub use gpu_layout;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Bounds3, DVec2, DVec3, Error, Result, UVec2};
    pub use crate::geom::{parse_mesh, Transform, Triangle};
    pub use crate::material::{Material, Rgb, Rgba};
    pub use crate::scene::{
        AssetSource, FsAssets, LightPatch, MemoryAssets, MeshHandle, ModelDesc, RoomDesc, RoomMaterials,
        SceneBuffers, SceneBuilder, SceneDesc, Sphere,
    };
    pub use crate::render::{
        FrameOrchestrator, InputState, MoveIntents, RecordingBackend, RenderBackend, RendererContext, Settings,
        SkyConfig,
    };
}
