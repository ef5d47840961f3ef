//! Surface materials for meshes and spheres.
//!
//! A [`Material`] is a plain value: every field has a documented default and
//! can be overridden on its own, either through the `with_*` builders or in
//! JSON (missing keys keep their defaults).

mod color;

pub use color::{Rgb, Rgba};

use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Surface description shared by mesh and sphere records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Rgb,
    pub emission_color: Rgb,
    pub emission_strength: f64,
    pub smoothness: f64,
    /// Explicit override. `None` derives the value from smoothness, see
    /// [`Material::specular_probability`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specular_probability: Option<f64>,
    pub specular_color: Rgb,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            emission_color: Rgb::BLACK,
            emission_strength: 0.0,
            smoothness: 0.0,
            specular_probability: None,
            specular_color: Rgb::WHITE,
        }
    }
}

impl Material {
    /// Opaque white diffuse material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffuse material of the given color; all other fields default.
    pub fn colored(color: impl Into<Rgb>) -> Self {
        Self::default().with_color(color)
    }

    /// Pure emitter: black base color glowing with `color * strength`.
    pub fn emissive(color: impl Into<Rgb>, strength: f64) -> Self {
        Self::default().with_color(Rgb::BLACK).with_emission(color, strength)
    }

    pub fn with_color(mut self, color: impl Into<Rgb>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_emission(mut self, color: impl Into<Rgb>, strength: f64) -> Self {
        self.emission_color = color.into();
        self.emission_strength = strength.max(0.0);
        self
    }

    pub fn with_smoothness(mut self, smoothness: f64) -> Self {
        self.smoothness = smoothness.clamp(0.0, 1.0);
        self
    }

    pub fn with_specular_probability(mut self, probability: f64) -> Self {
        self.specular_probability = Some(probability.clamp(0.0, 1.0));
        self
    }

    pub fn with_specular_color(mut self, color: impl Into<Rgb>) -> Self {
        self.specular_color = color.into();
        self
    }

    /// Effective specular probability.
    ///
    /// An explicit override wins; otherwise 1 for any non-zero smoothness
    /// and 0 for a perfectly rough surface.
    pub fn specular_probability(&self) -> f64 {
        match self.specular_probability {
            Some(p) => p,
            None if self.smoothness != 0.0 => 1.0,
            None => 0.0,
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0
    }

    /// Range check for values that bypassed the builders, e.g. JSON input.
    ///
    /// Emission strength must be >= 0; smoothness and an explicit specular
    /// probability must lie in `[0, 1]`. NaN fails every check.
    pub fn validate(&self) -> Result<()> {
        if !(self.emission_strength >= 0.0) {
            return Err(Error::config(format!(
                "emission_strength must be >= 0, got {}",
                self.emission_strength
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothness) {
            return Err(Error::config(format!(
                "smoothness must be in [0, 1], got {}",
                self.smoothness
            )));
        }
        if let Some(p) = self.specular_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::config(format!("specular_probability must be in [0, 1], got {p}")));
            }
        }
        Ok(())
    }
}
