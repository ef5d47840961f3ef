//! First-person camera driven by boolean intents.

use std::f64::consts::FRAC_PI_2;

use super::settings::Settings;
use crate::util::{to_f32_array, DVec3};

/// Distance kept from the poles when clamping pitch.
pub const PITCH_EPSILON: f64 = 1e-5;
pub const MAX_PITCH: f64 = FRAC_PI_2 - PITCH_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: DVec3,
    /// Radians. Zero looks down +Z.
    pub yaw: f64,
    /// Radians, kept within `±MAX_PITCH`.
    pub pitch: f64,
    pub plane_distance: f64,
    /// Degrees.
    pub field_of_view: f64,
}

impl CameraState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            position: settings.camera.position,
            yaw: settings.camera.yaw,
            pitch: settings.camera.pitch.clamp(-MAX_PITCH, MAX_PITCH),
            plane_distance: settings.plane_distance,
            field_of_view: settings.field_of_view,
        }
    }

    /// Horizontal forward axis for the current yaw.
    pub fn forward(&self) -> DVec3 {
        let (s, c) = self.yaw.sin_cos();
        DVec3::new(s, 0.0, c)
    }

    /// Horizontal right axis for the current yaw.
    pub fn right(&self) -> DVec3 {
        let (s, c) = self.yaw.sin_cos();
        DVec3::new(c, 0.0, -s)
    }

    pub fn encode(&self) -> gpu_layout::CameraBlock {
        gpu_layout::CameraBlock {
            position: to_f32_array(self.position),
            pitch: self.pitch as f32,
            yaw: self.yaw as f32,
            plane_distance: self.plane_distance as f32,
            field_of_view: self.field_of_view as f32,
            _pad: 0.0,
        }
    }
}

/// Held movement and rotation inputs for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntents {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

impl MoveIntents {
    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    /// Units per second.
    move_speed: f64,
    /// Radians per second.
    rotate_speed: f64,
}

impl CameraController {
    pub fn new(state: CameraState, move_speed: f64, rotate_speed: f64) -> Self {
        Self { state, move_speed, rotate_speed }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(CameraState::from_settings(settings), settings.move_speed, settings.rotate_speed)
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Direct access for scripted poses; pitch is re-clamped on the next update.
    pub fn state_mut(&mut self) -> &mut CameraState {
        &mut self.state
    }

    /// Advance by `dt` seconds. Intents are ignored while accumulating; the
    /// pitch clamp is applied either way.
    pub fn update(&mut self, dt: f64, intents: &MoveIntents, accumulating: bool) {
        if !accumulating {
            let step = self.move_speed * dt;
            let turn = self.rotate_speed * dt;
            let forward = self.state.forward();
            let right = self.state.right();

            let mut delta = DVec3::ZERO;
            if intents.forward {
                delta += forward * step;
            }
            if intents.back {
                delta -= forward * step;
            }
            if intents.right {
                delta += right * step;
            }
            if intents.left {
                delta -= right * step;
            }
            if intents.up {
                delta.y += step;
            }
            if intents.down {
                delta.y -= step;
            }
            self.state.position += delta;

            if intents.pitch_up {
                self.state.pitch += turn;
            }
            if intents.pitch_down {
                self.state.pitch -= turn;
            }
            if intents.yaw_right {
                self.state.yaw += turn;
            }
            if intents.yaw_left {
                self.state.yaw -= turn;
            }
        }
        self.state.pitch = self.state.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn controller() -> CameraController {
        CameraController::new(
            CameraState {
                position: DVec3::ZERO,
                yaw: 0.0,
                pitch: 0.0,
                plane_distance: 1.0,
                field_of_view: 60.0,
            },
            2.0,
            0.5,
        )
    }

    fn all_intents() -> MoveIntents {
        MoveIntents {
            forward: true,
            right: true,
            up: true,
            pitch_up: true,
            yaw_right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_move_along_yaw_axes() {
        let mut cam = controller();
        cam.update(0.5, &MoveIntents { forward: true, ..Default::default() }, false);
        assert!((cam.state().position - DVec3::new(0.0, 0.0, 1.0)).length() < EPS);

        cam.state_mut().yaw = FRAC_PI_2;
        cam.update(0.5, &MoveIntents { forward: true, ..Default::default() }, false);
        assert!((cam.state().position - DVec3::new(1.0, 0.0, 1.0)).length() < EPS);

        cam.update(0.5, &MoveIntents { right: true, up: true, ..Default::default() }, false);
        assert!((cam.state().position - DVec3::new(1.0, 1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_rotation_rates() {
        let mut cam = controller();
        cam.update(2.0, &MoveIntents { yaw_right: true, pitch_down: true, ..Default::default() }, false);
        assert!((cam.state().yaw - 1.0).abs() < EPS);
        assert!((cam.state().pitch + 1.0).abs() < EPS);
    }

    #[test]
    fn test_pitch_always_clamped() {
        let mut cam = controller();
        for _ in 0..100 {
            cam.update(1.0, &MoveIntents { pitch_up: true, ..Default::default() }, false);
            assert!(cam.state().pitch < FRAC_PI_2 && cam.state().pitch > -FRAC_PI_2);
        }
        assert_eq!(cam.state().pitch, MAX_PITCH);

        // External write, no intents, accumulating: still clamped.
        cam.state_mut().pitch = -10.0;
        cam.update(0.0, &MoveIntents::default(), true);
        assert_eq!(cam.state().pitch, -MAX_PITCH);
    }

    #[test]
    fn test_frozen_while_accumulating() {
        let mut cam = controller();
        let before = *cam.state();
        cam.update(1.0, &all_intents(), true);
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn test_encode_layout() {
        let state = CameraState {
            position: DVec3::new(1.0, 2.0, 3.0),
            yaw: 0.25,
            pitch: -0.5,
            plane_distance: 1.5,
            field_of_view: 60.0,
        };
        let block = state.encode();
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&block));
        assert_eq!(floats, &[1.0, 2.0, 3.0, -0.5, 0.25, 1.5, 60.0, 0.0]);
    }

    #[test]
    fn test_from_settings() {
        let cam = CameraController::from_settings(&Settings::default());
        assert_eq!(cam.state().position, DVec3::new(10.0, 3.0, 0.0));
        assert_eq!(cam.state().yaw, -FRAC_PI_2);
        assert!(MoveIntents { down: true, ..Default::default() }.any());
        assert!(!MoveIntents::default().any());
    }
}
