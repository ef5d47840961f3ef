//! Scene assembly: load -> place -> append.
//!
//! Every public operation here is all-or-nothing with respect to the scene
//! buffers. All loading, parsing, validation and placement happens on
//! temporaries first; the final append cannot fail.

use std::collections::HashMap;

use rayon::prelude::*;

use super::assets::{load_asset, load_assets, AssetSource};
use super::buffers::{MeshHandle, SceneBuffers, Sphere};
use super::desc::{ModelDesc, SceneDesc};
use super::room::RoomDesc;
use crate::geom::{PlacedMesh, Triangle};
use crate::material::Material;
use crate::util::{Error, Result};

/// Handles for everything a [`SceneBuilder::build_from_desc`] call appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub models: Vec<MeshHandle>,
    pub rooms: Vec<Vec<MeshHandle>>,
    pub spheres: Vec<u32>,
}

/// Appends assets from an [`AssetSource`] into [`SceneBuffers`].
pub struct SceneBuilder<'a> {
    assets: &'a dyn AssetSource,
    buffers: SceneBuffers,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(assets: &'a dyn AssetSource) -> Self {
        Self::with_buffers(assets, SceneBuffers::new())
    }

    /// Continue appending to an existing scene.
    pub fn with_buffers(assets: &'a dyn AssetSource, buffers: SceneBuffers) -> Self {
        Self { assets, buffers }
    }

    pub fn buffers(&self) -> &SceneBuffers {
        &self.buffers
    }

    pub fn into_buffers(self) -> SceneBuffers {
        self.buffers
    }

    /// Load one asset, place it and append it as a single mesh.
    pub fn add_model(&mut self, model: &ModelDesc) -> Result<MeshHandle> {
        model.validate()?;
        let triangles = load_asset(self.assets, &model.asset)?;
        let placed = model.transform.place(&triangles);
        Ok(self.buffers.append_asset(&placed, &model.material))
    }

    pub fn add_sphere(&mut self, sphere: &Sphere) -> Result<u32> {
        self.buffers.add_sphere(sphere)
    }

    /// Append a room: six walls plus the optional light panel, or nothing.
    pub fn add_room(&mut self, room: &RoomDesc) -> Result<Vec<MeshHandle>> {
        room.validate()?;
        let loaded = load_assets(self.assets, room.asset_names())?;
        let parts = room.plan(&loaded)?;
        Ok(self.commit(&parts))
    }

    /// Build a whole scene description.
    ///
    /// Assets are fetched and parsed concurrently. Any failure aborts before
    /// the first append, leaving the buffers untouched.
    #[tracing::instrument(skip_all, fields(models = desc.models.len(), rooms = desc.rooms.len(), spheres = desc.spheres.len()))]
    pub fn build_from_desc(&mut self, desc: &SceneDesc) -> Result<BuildReport> {
        for model in &desc.models {
            model.validate()?;
        }
        for sphere in &desc.spheres {
            sphere.validate()?;
        }
        for room in &desc.rooms {
            room.validate()?;
        }

        let loaded = load_assets(self.assets, desc.asset_names())?;

        let models: Vec<(PlacedMesh, Material)> = desc
            .models
            .par_iter()
            .map(|model| -> Result<(PlacedMesh, Material)> {
                let triangles = lookup(&loaded, &model.asset)?;
                Ok((model.transform.place(triangles), model.material))
            })
            .collect::<Result<_>>()?;

        let rooms = desc
            .rooms
            .iter()
            .map(|room| room.plan(&loaded))
            .collect::<Result<Vec<_>>>()?;

        let mut report = BuildReport {
            models: self.commit(&models),
            ..Default::default()
        };
        for parts in &rooms {
            report.rooms.push(self.commit(parts));
        }
        for sphere in &desc.spheres {
            report.spheres.push(self.buffers.add_sphere(sphere)?);
        }

        tracing::info!(
            triangles = self.buffers.triangles().len(),
            meshes = self.buffers.meshes().len(),
            spheres = self.buffers.spheres().len(),
            "scene built"
        );
        Ok(report)
    }

    fn commit(&mut self, parts: &[(PlacedMesh, Material)]) -> Vec<MeshHandle> {
        parts
            .iter()
            .map(|(placed, material)| self.buffers.append_asset(placed, material))
            .collect()
    }
}

fn lookup<'m>(loaded: &'m HashMap<String, Vec<Triangle>>, name: &str) -> Result<&'m [Triangle]> {
    loaded
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::AssetNotFound(name.to_string()).in_asset(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Transform;
    use crate::material::Rgb;
    use crate::scene::assets::MemoryAssets;
    use crate::scene::room::{LightPatch, RoomMaterials};
    use crate::util::{DVec2, DVec3};

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
    const CUBE: &str = include_str!("../../data/meshes/cube.obj");

    fn assets() -> MemoryAssets {
        MemoryAssets::new().with("tri.obj", TRI).with("cube.obj", CUBE)
    }

    fn snapshot(buffers: &SceneBuffers) -> [Vec<u8>; 3] {
        [
            buffers.triangles().as_bytes().to_vec(),
            buffers.meshes().as_bytes().to_vec(),
            buffers.spheres().as_bytes().to_vec(),
        ]
    }

    #[test]
    fn test_add_model() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        let model = ModelDesc::new("tri.obj", Transform::new(DVec3::ONE, DVec3::ZERO, DVec3::X), Material::new());
        let handle = builder.add_model(&model).unwrap();
        assert_eq!(handle, MeshHandle { mesh_index: 1, first_triangle: 1, triangle_count: 1 });

        let mesh = builder.buffers().mesh(1).unwrap();
        assert_eq!(mesh.bounds.min, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.bounds.max, DVec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_failed_model_leaves_scene_untouched() {
        let assets = assets().with("broken.obj", "v 0 0 0\nf 1 2 3\n");
        let mut builder = SceneBuilder::new(&assets);
        builder.add_model(&ModelDesc::new("tri.obj", Transform::IDENTITY, Material::new())).unwrap();
        let before = snapshot(builder.buffers());

        assert!(builder.add_model(&ModelDesc::new("broken.obj", Transform::IDENTITY, Material::new())).is_err());
        assert!(builder.add_model(&ModelDesc::new("missing.obj", Transform::IDENTITY, Material::new())).is_err());
        assert_eq!(snapshot(builder.buffers()), before);
    }

    #[test]
    fn test_room_atomic_on_light_failure() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        let before = snapshot(builder.buffers());

        let mut light = LightPatch::new(DVec2::splat(0.5), Material::emissive(Rgb::WHITE, 5.0));
        light.asset = "missing_panel.obj".into();
        let room = RoomDesc::new(DVec3::ZERO, DVec3::ONE, RoomMaterials::default()).with_light(light);

        assert!(builder.add_room(&room).is_err());
        assert_eq!(snapshot(builder.buffers()), before);
    }

    #[test]
    fn test_room_with_light() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        let room = RoomDesc::new(DVec3::ZERO, DVec3::ONE, RoomMaterials::default())
            .with_light(LightPatch::new(DVec2::splat(0.5), Material::emissive(Rgb::WHITE, 5.0)));
        let handles = builder.add_room(&room).unwrap();

        assert_eq!(handles.len(), 7);
        assert_eq!(builder.buffers().meshes().len(), 8);
        assert_eq!(builder.buffers().triangles().len(), 1 + 7 * 12);
        for pair in handles.windows(2) {
            assert_eq!(pair[1].first_triangle, pair[0].first_triangle + pair[0].triangle_count);
        }
    }

    #[test]
    fn test_build_from_desc_atomic() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        let before = snapshot(builder.buffers());

        let mut desc = SceneDesc {
            models: vec![ModelDesc::new("tri.obj", Transform::IDENTITY, Material::new())],
            rooms: vec![],
            spheres: vec![Sphere::new(DVec3::ZERO, -1.0, Material::new())],
        };
        assert!(matches!(builder.build_from_desc(&desc), Err(Error::Config(_))));
        assert_eq!(snapshot(builder.buffers()), before);

        desc.spheres[0].radius = 1.0;
        desc.models.push(ModelDesc::new("nope.obj", Transform::IDENTITY, Material::new()));
        assert!(builder.build_from_desc(&desc).is_err());
        assert_eq!(snapshot(builder.buffers()), before);

        desc.models.pop();
        let report = builder.build_from_desc(&desc).unwrap();
        assert_eq!(report.models.len(), 1);
        assert_eq!(report.spheres, vec![1]);
    }

    #[test]
    fn test_out_of_range_material_rejected() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        builder.add_model(&ModelDesc::new("tri.obj", Transform::IDENTITY, Material::new())).unwrap();
        let before = snapshot(builder.buffers());

        let desc = SceneDesc::from_json_str(
            r#"{ "spheres": [{ "center": [0, 1, 0], "radius": 1,
                 "material": { "smoothness": 5.0, "emission_strength": -3.0, "specular_probability": 7.0 } }] }"#,
        )
        .unwrap();
        assert!(matches!(builder.build_from_desc(&desc), Err(Error::Config(_))));
        assert!(matches!(builder.add_sphere(&desc.spheres[0]), Err(Error::Config(_))));
        assert_eq!(snapshot(builder.buffers()), before);

        let glowing_dark = Material { emission_strength: -1.0, ..Default::default() };
        let model = ModelDesc::new("tri.obj", Transform::IDENTITY, glowing_dark);
        assert!(matches!(builder.add_model(&model), Err(Error::Config(_))));
        let desc = SceneDesc { models: vec![model], ..Default::default() };
        assert!(matches!(builder.build_from_desc(&desc), Err(Error::Config(_))));

        let mut room = RoomDesc::new(DVec3::ZERO, DVec3::ONE, RoomMaterials::default());
        room.materials.back.smoothness = 1.5;
        assert!(matches!(builder.add_room(&room), Err(Error::Config(_))));

        let light = LightPatch::new(
            DVec2::splat(0.5),
            Material { specular_probability: Some(2.0), ..Material::emissive(Rgb::WHITE, 5.0) },
        );
        let room = RoomDesc::new(DVec3::ZERO, DVec3::ONE, RoomMaterials::default()).with_light(light);
        assert!(matches!(builder.add_room(&room), Err(Error::Config(_))));

        assert_eq!(snapshot(builder.buffers()), before);
    }

    #[test]
    fn test_build_order() {
        let assets = assets();
        let mut builder = SceneBuilder::new(&assets);
        let desc = SceneDesc {
            models: vec![
                ModelDesc::new("cube.obj", Transform::IDENTITY, Material::new()),
                ModelDesc::new("tri.obj", Transform::IDENTITY, Material::new().with_smoothness(1.0)),
            ],
            rooms: vec![RoomDesc::new(DVec3::ZERO, DVec3::splat(5.0), RoomMaterials::default())],
            spheres: vec![],
        };
        let report = builder.build_from_desc(&desc).unwrap();

        assert_eq!(report.models[0], MeshHandle { mesh_index: 1, first_triangle: 1, triangle_count: 12 });
        assert_eq!(report.models[1], MeshHandle { mesh_index: 2, first_triangle: 13, triangle_count: 1 });
        assert_eq!(report.rooms[0][0].mesh_index, 3);
        assert_eq!(builder.buffers().mesh(2).unwrap().material.smoothness, 1.0);
    }
}
