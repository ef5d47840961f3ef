//! Sky gradient and sun parameters.
//!
//! The sun direction is stored compressed: two components scaled by
//! [`SUN_REFERENCE_LEN`]. Lifting rebuilds z from the unit-sphere equation and
//! always yields z >= 0, so a direction below the horizon plane (negative z)
//! cannot be represented.

use serde::{Deserialize, Serialize};

use crate::material::Rgb;
use crate::util::{to_f32_array, DVec2, DVec3, Error, Result};

/// Length of the reference xy vector (0.3, 0.8) the compressed form is
/// relative to.
pub const SUN_REFERENCE_LEN: f64 = 0.854_400_374_531_753;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub horizon_color: Rgb,
    pub zenith_color: Rgb,
    pub ground_color: Rgb,
    /// Compressed form, see [`lift_sun_direction`].
    pub sun_direction: DVec2,
    pub sun_focus: f64,
    pub sun_intensity: f64,
    pub disabled: bool,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            horizon_color: Rgb::from_u8(255, 255, 255),
            zenith_color: Rgb::from_u8(102, 204, 255),
            ground_color: Rgb::from_u8(171, 161, 145),
            sun_direction: DVec2::new(0.352, 0.937),
            sun_focus: 400.0,
            sun_intensity: 100.0,
            disabled: false,
        }
    }
}

impl SkyConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("sun_focus", self.sun_focus), ("sun_intensity", self.sun_intensity)] {
            if !(value >= 0.0) {
                return Err(Error::config(format!("sky.{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }

    pub fn encode(&self) -> gpu_layout::SkyBlock {
        let sun = lift_sun_direction(self.sun_direction, SUN_REFERENCE_LEN);
        gpu_layout::SkyBlock {
            horizon_color: self.horizon_color.to_f32_array(),
            zenith_color: self.zenith_color.to_f32_array(),
            ground_color: self.ground_color.to_f32_array(),
            sun_direction: to_f32_array(sun),
            sun_focus: self.sun_focus as f32,
            sun_intensity: self.sun_intensity as f32,
            disabled: if self.disabled { 1.0 } else { 0.0 },
            ..Default::default()
        }
    }
}

/// Rebuild a 3D direction from its compressed xy form.
///
/// `z = sqrt(max(0, 1 - x² - y²))` after rescaling by `reference_len`; the
/// result is unit length whenever the rescaled xy lies inside the unit disk.
pub fn lift_sun_direction(compressed: DVec2, reference_len: f64) -> DVec3 {
    let xy = compressed * reference_len;
    let z = (1.0 - xy.length_squared()).max(0.0).sqrt();
    xy.extend(z)
}

/// Inverse of [`lift_sun_direction`] for directions with z >= 0. The sign of
/// z is dropped.
pub fn compress_sun_direction(direction: DVec3, reference_len: f64) -> DVec2 {
    direction.normalize_or_zero().truncate() / reference_len
}
