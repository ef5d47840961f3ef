//! Startup settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::sky::SkyConfig;
use crate::util::{DVec3, Error, Result, UVec2};

/// Bounce and sample budget for one render mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPreset {
    pub max_bounce_count: u32,
    pub samples_per_pixel: u32,
}

/// Per-frame render parameters as encoded for the backend.
///
/// The strengths are written as unsigned integer words, truncated toward
/// zero. [`Settings::validate`] only admits whole, non-negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub max_bounce_count: u32,
    pub samples_per_pixel: u32,
    pub diverge_strength: f64,
    pub defocus_strength: f64,
}

impl RenderConfig {
    pub fn encode(&self) -> gpu_layout::RenderConfigBlock {
        gpu_layout::RenderConfigBlock {
            max_bounce_count: self.max_bounce_count,
            samples_per_pixel: self.samples_per_pixel,
            diverge_strength: self.diverge_strength as u32,
            defocus_strength: self.defocus_strength as u32,
        }
    }
}

/// Initial camera pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraStart {
    pub position: DVec3,
    /// Radians.
    pub yaw: f64,
    /// Radians.
    pub pitch: f64,
}

impl Default for CameraStart {
    fn default() -> Self {
        Self {
            position: DVec3::new(10.0, 3.0, 0.0),
            yaw: -std::f64::consts::FRAC_PI_2,
            pitch: 0.0,
        }
    }
}

/// Everything read once at startup. No derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output
    pub resolution: UVec2,

    // Sampling
    pub preview: RenderPreset,
    pub accumulate: RenderPreset,
    pub diverge_strength: f64,
    pub defocus_strength: f64,

    // Projection
    pub plane_distance: f64,
    /// Degrees.
    pub field_of_view: f64,

    // Camera
    pub camera: CameraStart,
    /// Units per second.
    pub move_speed: f64,
    /// Radians per second.
    pub rotate_speed: f64,

    pub sky: SkyConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: UVec2::new(900, 600),
            preview: RenderPreset { max_bounce_count: 3, samples_per_pixel: 2 },
            accumulate: RenderPreset { max_bounce_count: 5, samples_per_pixel: 6 },
            diverge_strength: 2.0,
            defocus_strength: 0.0,
            plane_distance: 1.0,
            field_of_view: 60.0,
            camera: CameraStart::default(),
            move_speed: 1.0,
            rotate_speed: 0.5,
            sky: SkyConfig::default(),
        }
    }
}

impl Settings {
    /// `<config dir>/pathtrace-host/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("pathtrace-host");
            p.push("settings.json");
            p
        })
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from [`default_path`](Self::default_path) when that file
    /// exists, built-in defaults otherwise.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::info!(path = %path.display(), "loading settings");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution.x == 0 || self.resolution.y == 0 {
            return Err(Error::config(format!("resolution must be non-zero, got {}", self.resolution)));
        }
        for (name, preset) in [("preview", &self.preview), ("accumulate", &self.accumulate)] {
            if preset.samples_per_pixel == 0 {
                return Err(Error::config(format!("{name}.samples_per_pixel must be > 0")));
            }
        }
        if self.plane_distance.is_nan() || self.plane_distance <= 0.0 {
            return Err(Error::config(format!("plane_distance must be > 0, got {}", self.plane_distance)));
        }
        let fov = self.field_of_view;
        if fov.is_nan() || fov <= 0.0 || fov >= 180.0 {
            return Err(Error::config(format!(
                "field_of_view must be in (0, 180) degrees, got {fov}"
            )));
        }
        for (name, value) in [("move_speed", self.move_speed), ("rotate_speed", self.rotate_speed)] {
            if !(value >= 0.0) {
                return Err(Error::config(format!("{name} must be >= 0, got {value}")));
            }
        }
        for (name, value) in [
            ("diverge_strength", self.diverge_strength),
            ("defocus_strength", self.defocus_strength),
        ] {
            if !(value >= 0.0) || value.fract() != 0.0 || value > u32::MAX as f64 {
                return Err(Error::config(format!(
                    "{name} must be a non-negative whole number, got {value}"
                )));
            }
        }
        self.sky.validate()
    }

    /// Preset for the given mode plus the shared ray spread settings.
    pub fn render_config(&self, accumulating: bool) -> RenderConfig {
        let preset = if accumulating { self.accumulate } else { self.preview };
        RenderConfig {
            max_bounce_count: preset.max_bounce_count,
            samples_per_pixel: preset.samples_per_pixel,
            diverge_strength: self.diverge_strength,
            defocus_strength: self.defocus_strength,
        }
    }
}
