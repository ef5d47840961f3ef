//! Renderer state owned in one place and driven one tick at a time.

use super::backend::{FrameUniforms, RenderBackend};
use super::camera::{CameraController, MoveIntents};
use super::frame::{FrameOrchestrator, FramePlan};
use super::settings::Settings;
use crate::scene::{AssetSource, BuildReport, SceneBuffers, SceneBuilder, SceneDesc};
use crate::util::Result;

/// External input sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub intents: MoveIntents,
    /// Flip between preview and accumulation this tick.
    pub toggle_accumulate: bool,
}

/// Settings, scene, camera, frame state and backend.
///
/// Ticks are synchronous and never overlap; nothing here is shared.
pub struct RendererContext<B: RenderBackend> {
    settings: Settings,
    scene: SceneBuffers,
    /// Scene revision the backend last received. `None` forces an upload on
    /// the next tick.
    uploaded_revision: Option<u64>,
    camera: CameraController,
    frames: FrameOrchestrator,
    backend: B,
}

impl<B: RenderBackend> RendererContext<B> {
    /// Validate settings and hand the finished scene to the backend.
    #[tracing::instrument(skip_all)]
    pub fn setup(settings: Settings, scene: SceneBuffers, mut backend: B) -> Result<Self> {
        settings.validate()?;
        backend.upload_scene(&scene);
        tracing::info!(
            width = settings.resolution.x,
            height = settings.resolution.y,
            triangles = scene.triangles().len(),
            meshes = scene.meshes().len(),
            spheres = scene.spheres().len(),
            "renderer ready"
        );
        Ok(Self {
            camera: CameraController::from_settings(&settings),
            frames: FrameOrchestrator::new(),
            uploaded_revision: Some(scene.revision()),
            settings,
            scene,
            backend,
        })
    }

    /// Run one frame: mode toggle, camera, uniforms, dispatch.
    pub fn tick(&mut self, dt: f64, input: &InputState) -> FramePlan {
        if input.toggle_accumulate {
            self.frames.toggle();
        }
        if self.uploaded_revision != Some(self.scene.revision()) {
            tracing::debug!(revision = self.scene.revision(), "re-uploading scene");
            self.backend.upload_scene(&self.scene);
            self.uploaded_revision = Some(self.scene.revision());
        }

        self.camera.update(dt, &input.intents, self.frames.is_accumulating());
        let plan = self.frames.next_frame();
        let uniforms = self.encode_uniforms(&plan);

        if plan.reset_history {
            self.backend.clear_history();
        }
        self.backend.write_uniforms(&uniforms);
        self.backend.dispatch(self.settings.resolution, plan.accumulating);
        plan
    }

    pub fn encode_uniforms(&self, plan: &FramePlan) -> FrameUniforms {
        FrameUniforms {
            camera: self.camera.state().encode(),
            sky: self.settings.sky.encode(),
            render_config: self.settings.render_config(plan.accumulating).encode(),
            frame_info: plan.encode(self.settings.resolution),
        }
    }

    /// Append more objects after setup. The backend gets the new buffers on
    /// the next tick. On error the scene is unchanged.
    pub fn extend_scene(&mut self, assets: &dyn AssetSource, desc: &SceneDesc) -> Result<BuildReport> {
        let mut builder = SceneBuilder::with_buffers(assets, std::mem::take(&mut self.scene));
        let result = builder.build_from_desc(desc);
        self.scene = builder.into_buffers();
        result
    }

    pub fn set_accumulating(&mut self, accumulating: bool) {
        self.frames.set_accumulating(accumulating);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &SceneBuffers {
        &self.scene
    }

    /// Swap in a different scene and return the old one. The next tick
    /// uploads it whatever its revision.
    pub fn replace_scene(&mut self, scene: SceneBuffers) -> SceneBuffers {
        self.uploaded_revision = None;
        std::mem::replace(&mut self.scene, scene)
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn frames(&self) -> &FrameOrchestrator {
        &self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
