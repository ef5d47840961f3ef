//! JSON scene description.
//!
//! ```json
//! {
//!   "models":  [{ "asset": "bunny.obj", "transform": { "scale": [2, 2, 2] }, "material": { "smoothness": 0.9 } }],
//!   "rooms":   [{ "center": [0, 2, 0], "half_extents": [3, 2, 3], "light": { "size": [0.4, 0.4] } }],
//!   "spheres": [{ "center": [0, 1, 0], "radius": 1 }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::buffers::Sphere;
use super::room::RoomDesc;
use crate::geom::Transform;
use crate::material::Material;
use crate::util::Result;

/// One asset placed once in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub asset: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
}

impl ModelDesc {
    pub fn new(asset: impl Into<String>, transform: Transform, material: Material) -> Self {
        Self { asset: asset.into(), transform, material }
    }

    pub fn validate(&self) -> Result<()> {
        self.material.validate()
    }
}

/// Everything the builder appends, in order: models, rooms, spheres.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDesc {
    pub models: Vec<ModelDesc>,
    pub rooms: Vec<RoomDesc>,
    pub spheres: Vec<Sphere>,
}

impl SceneDesc {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Every asset name referenced by models and rooms, in description order.
    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .map(|m| m.asset.as_str())
            .chain(self.rooms.iter().flat_map(RoomDesc::asset_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::DVec3;

    #[test]
    fn test_parse_full() {
        let desc = SceneDesc::from_json_str(
            r#"{
                "models": [{ "asset": "a.obj", "transform": { "translation": [1, 2, 3] } }],
                "rooms": [{ "center": [0, 0, 0], "half_extents": [1, 1, 1],
                            "light": { "asset": "panel.obj", "size": [0.5, 0.5] } }],
                "spheres": [{ "center": [0, 1, 0], "radius": 0.5, "material": { "smoothness": 1 } }]
            }"#,
        )
        .unwrap();

        assert_eq!(desc.models[0].transform.translation, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(desc.models[0].transform.scale, DVec3::ONE);
        assert_eq!(desc.spheres[0].radius, 0.5);
        let names: Vec<&str> = desc.asset_names().collect();
        assert_eq!(names, ["a.obj", "cube.obj", "panel.obj"]);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert_eq!(SceneDesc::from_json_str("{}").unwrap(), SceneDesc::default());
        assert!(SceneDesc::from_json_str(r#"{ "models": [{}] }"#).is_err());
    }
}
