//! Six-sided room made of oriented unit-cube instances.
//!
//! Every wall is the same unit cube asset (spanning `[-0.5, 0.5]` on each
//! axis) squashed to `wall_thickness` and moved just outside the interior
//! volume `center ± half_extents`. An optional thin emissive panel is set
//! into the ceiling.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::geom::{PlacedMesh, Transform, Triangle};
use crate::material::{Material, Rgb};
use crate::util::{DVec2, DVec3, Error, Result};

pub const DEFAULT_CUBE_ASSET: &str = "cube.obj";

fn default_cube_asset() -> String {
    DEFAULT_CUBE_ASSET.to_string()
}

fn default_wall_thickness() -> f64 {
    0.1
}

fn default_light_material() -> Material {
    Material::emissive(Rgb::WHITE, 4.0)
}

/// Room parameters. `half_extents` describe the empty interior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDesc {
    pub center: DVec3,
    pub half_extents: DVec3,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
    /// Unit cube used for every wall.
    #[serde(default = "default_cube_asset")]
    pub asset: String,
    #[serde(default)]
    pub materials: RoomMaterials,
    #[serde(default)]
    pub light: Option<LightPatch>,
}

/// One material per wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomMaterials {
    pub floor: Material,
    pub ceiling: Material,
    pub left: Material,
    pub right: Material,
    pub back: Material,
    pub front: Material,
}

impl RoomMaterials {
    /// Same material on all six walls.
    pub fn uniform(material: Material) -> Self {
        Self {
            floor: material,
            ceiling: material,
            left: material,
            right: material,
            back: material,
            front: material,
        }
    }

    pub fn get(&self, wall: Wall) -> &Material {
        match wall {
            Wall::Floor => &self.floor,
            Wall::Ceiling => &self.ceiling,
            Wall::Left => &self.left,
            Wall::Right => &self.right,
            Wall::Back => &self.back,
            Wall::Front => &self.front,
        }
    }
}

/// Emissive ceiling panel. `size` is a fraction of the ceiling's x/z span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightPatch {
    #[serde(default = "default_cube_asset")]
    pub asset: String,
    pub size: DVec2,
    #[serde(default = "default_light_material")]
    pub material: Material,
}

impl LightPatch {
    pub fn new(size: DVec2, material: Material) -> Self {
        Self { asset: default_cube_asset(), size, material }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    Floor,
    Ceiling,
    /// -X
    Left,
    /// +X
    Right,
    /// -Z
    Back,
    /// +Z
    Front,
}

impl Wall {
    pub const ALL: [Wall; 6] = [Wall::Floor, Wall::Ceiling, Wall::Left, Wall::Right, Wall::Back, Wall::Front];
}

impl RoomDesc {
    pub fn new(center: DVec3, half_extents: DVec3, materials: RoomMaterials) -> Self {
        Self {
            center,
            half_extents,
            wall_thickness: default_wall_thickness(),
            asset: default_cube_asset(),
            materials,
            light: None,
        }
    }

    pub fn with_light(mut self, light: LightPatch) -> Self {
        self.light = Some(light);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.half_extents.cmpgt(DVec3::ZERO).all() {
            return Err(Error::config(format!(
                "room half extents must be > 0, got {:?}",
                self.half_extents
            )));
        }
        if self.wall_thickness.is_nan() || self.wall_thickness <= 0.0 {
            return Err(Error::config(format!(
                "room wall thickness must be > 0, got {}",
                self.wall_thickness
            )));
        }
        for wall in Wall::ALL {
            self.materials.get(wall).validate()?;
        }
        if let Some(light) = &self.light {
            let s = light.size;
            if !(s.cmpgt(DVec2::ZERO).all() && s.cmple(DVec2::ONE).all()) {
                return Err(Error::config(format!("light patch size must be in (0, 1], got {s:?}")));
            }
            light.material.validate()?;
        }
        Ok(())
    }

    /// Asset names this room needs, walls first.
    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.asset.as_str()).chain(self.light.as_ref().map(|l| l.asset.as_str()))
    }

    /// Placement of one wall's unit cube.
    pub fn wall_transform(&self, wall: Wall) -> Transform {
        let c = self.center;
        let h = self.half_extents;
        let t = self.wall_thickness;
        let off = |half: f64| half + t * 0.5;

        match wall {
            Wall::Floor | Wall::Ceiling => {
                let y = if wall == Wall::Floor { c.y - off(h.y) } else { c.y + off(h.y) };
                Transform::new(
                    DVec3::new(2.0 * h.x + 2.0 * t, 2.0 * h.z + 2.0 * t, t),
                    DVec3::new(FRAC_PI_2, 0.0, 0.0),
                    DVec3::new(c.x, y, c.z),
                )
            }
            Wall::Left | Wall::Right => {
                let x = if wall == Wall::Left { c.x - off(h.x) } else { c.x + off(h.x) };
                Transform::new(
                    DVec3::new(2.0 * h.z + 2.0 * t, 2.0 * h.y, t),
                    DVec3::new(0.0, FRAC_PI_2, 0.0),
                    DVec3::new(x, c.y, c.z),
                )
            }
            Wall::Back | Wall::Front => {
                let z = if wall == Wall::Back { c.z - off(h.z) } else { c.z + off(h.z) };
                Transform::new(
                    DVec3::new(2.0 * h.x + 2.0 * t, 2.0 * h.y, t),
                    DVec3::ZERO,
                    DVec3::new(c.x, c.y, z),
                )
            }
        }
    }

    /// Placement of the ceiling light, centered on the ceiling's inner face.
    pub fn light_transform(&self) -> Option<Transform> {
        let light = self.light.as_ref()?;
        let h = self.half_extents;
        Some(Transform::new(
            DVec3::new(2.0 * h.x * light.size.x, 2.0 * h.z * light.size.y, self.wall_thickness),
            DVec3::new(FRAC_PI_2, 0.0, 0.0),
            DVec3::new(self.center.x, self.center.y + h.y, self.center.z),
        ))
    }

    /// Build every wall (and the light) without touching any scene buffer.
    ///
    /// `loaded` maps asset names to object-space triangles; a missing entry
    /// is an [`Error::AssetNotFound`].
    pub fn plan(&self, loaded: &HashMap<String, Vec<Triangle>>) -> Result<Vec<(PlacedMesh, Material)>> {
        self.validate()?;
        let lookup = |name: &str| {
            loaded
                .get(name)
                .ok_or_else(|| Error::AssetNotFound(name.to_string()).in_asset(name))
        };

        let cube = lookup(self.asset.as_str())?;
        let mut parts: Vec<(PlacedMesh, Material)> = Wall::ALL
            .iter()
            .map(|&wall| (self.wall_transform(wall).place(cube), *self.materials.get(wall)))
            .collect();

        if let (Some(light), Some(xf)) = (&self.light, self.light_transform()) {
            let panel = lookup(light.asset.as_str())?;
            parts.push((xf.place(panel), light.material));
        }
        Ok(parts)
    }
}
