//! The GPU-facing seam.
//!
//! A [`RenderBackend`] owns device buffers, pipelines and the image history.
//! Every call is fire-and-forget: the host never waits on GPU completion.

use gpu_layout::{CameraBlock, FrameInfoBlock, RenderConfigBlock, SkyBlock};

use crate::scene::SceneBuffers;
use crate::util::UVec2;

/// Compute workgroup edge length in pixels.
pub const WORKGROUP_SIZE: u32 = 8;

/// Workgroups needed to cover `resolution`, rounding up.
pub fn workgroup_count(resolution: UVec2) -> UVec2 {
    (resolution + UVec2::splat(WORKGROUP_SIZE - 1)) / WORKGROUP_SIZE
}

/// The four uniform blocks written every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub camera: CameraBlock,
    pub sky: SkyBlock,
    pub render_config: RenderConfigBlock,
    pub frame_info: FrameInfoBlock,
}

impl FrameUniforms {
    /// Raw bytes per block in binding order: camera, render config, sky,
    /// frame info.
    pub fn block_bytes(&self) -> [&[u8]; 4] {
        [
            bytemuck::bytes_of(&self.camera),
            bytemuck::bytes_of(&self.render_config),
            bytemuck::bytes_of(&self.sky),
            bytemuck::bytes_of(&self.frame_info),
        ]
    }
}

pub trait RenderBackend {
    /// (Re)create the three scene storage buffers from `scene`.
    fn upload_scene(&mut self, scene: &SceneBuffers);

    fn write_uniforms(&mut self, uniforms: &FrameUniforms);

    /// Drop all accumulated samples.
    fn clear_history(&mut self);

    /// Trace one frame. With `carry_history` the result becomes the history
    /// the next frame blends into.
    fn dispatch(&mut self, resolution: UVec2, carry_history: bool);
}

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    UploadScene {
        triangles: usize,
        meshes: usize,
        spheres: usize,
        bytes: usize,
    },
    WriteUniforms(FrameUniforms),
    ClearHistory,
    Dispatch {
        workgroups: UVec2,
        carry_history: bool,
    },
}

/// Backend that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Vec<BackendCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Uniforms from the most recent write.
    pub fn last_uniforms(&self) -> Option<&FrameUniforms> {
        self.commands.iter().rev().find_map(|c| match c {
            BackendCommand::WriteUniforms(u) => Some(u),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&BackendCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_scene(&mut self, scene: &SceneBuffers) {
        let bytes = scene.triangles().as_bytes().len()
            + scene.meshes().as_bytes().len()
            + scene.spheres().as_bytes().len();
        self.commands.push(BackendCommand::UploadScene {
            triangles: scene.triangles().len(),
            meshes: scene.meshes().len(),
            spheres: scene.spheres().len(),
            bytes,
        });
    }

    fn write_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.commands.push(BackendCommand::WriteUniforms(*uniforms));
    }

    fn clear_history(&mut self) {
        self.commands.push(BackendCommand::ClearHistory);
    }

    fn dispatch(&mut self, resolution: UVec2, carry_history: bool) {
        self.commands.push(BackendCommand::Dispatch {
            workgroups: workgroup_count(resolution),
            carry_history,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(UVec2::new(900, 600)), UVec2::new(113, 75));
        assert_eq!(workgroup_count(UVec2::new(8, 16)), UVec2::new(1, 2));
        assert_eq!(workgroup_count(UVec2::new(1, 1)), UVec2::new(1, 1));
    }

    #[test]
    fn test_recording_backend() {
        let mut backend = RecordingBackend::new();
        backend.upload_scene(&SceneBuffers::new());
        backend.clear_history();
        backend.dispatch(UVec2::new(16, 16), false);

        assert_eq!(
            backend.commands()[0],
            BackendCommand::UploadScene { triangles: 1, meshes: 1, spheres: 1, bytes: (24 + 24 + 20) * 4 }
        );
        assert_eq!(backend.count(|c| matches!(c, BackendCommand::ClearHistory)), 1);
        assert!(backend.last_uniforms().is_none());
        assert_eq!(backend.take_commands().len(), 3);
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn test_block_bytes() {
        let uniforms = FrameUniforms {
            camera: CameraBlock::default(),
            sky: SkyBlock::default(),
            render_config: RenderConfigBlock::default(),
            frame_info: FrameInfoBlock::default(),
        };
        let sizes: Vec<usize> = uniforms.block_bytes().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, [32, 16, 72, 16]);
    }
}
