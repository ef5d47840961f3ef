//! Per-tick frame orchestration.
//!
//! ```text
//! InputState -> RendererContext::tick
//!                 |- FrameOrchestrator  (preview / accumulate, frame count)
//!                 |- CameraController   (frozen while accumulating)
//!                 |- uniform encoding   (camera, sky, render config, frame info)
//!                 `- RenderBackend      (clear history, write uniforms, dispatch)
//! ```

mod backend;
mod camera;
mod context;
mod frame;
mod settings;
mod sky;

pub use backend::{workgroup_count, BackendCommand, FrameUniforms, RecordingBackend, RenderBackend, WORKGROUP_SIZE};
pub use camera::{CameraController, CameraState, MoveIntents, MAX_PITCH, PITCH_EPSILON};
pub use context::{InputState, RendererContext};
pub use frame::{FrameOrchestrator, FramePlan, CHECKPOINT_INTERVAL, CHECKPOINT_LIMIT};
pub use settings::{CameraStart, RenderConfig, RenderPreset, Settings};
pub use sky::{compress_sun_direction, lift_sun_direction, SkyConfig, SUN_REFERENCE_LEN};
