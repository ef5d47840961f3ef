//! Scene building against the mesh files under data/

use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

use pathtrace_host::gpu_layout::{GpuMesh, GpuRecord, GpuTriangle};
use pathtrace_host::prelude::*;
use pathtrace_host::scene::decode_mesh;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn mesh_assets() -> FsAssets {
    FsAssets::new(data_dir().join("meshes"))
}

#[test]
fn test_rotated_panel_bounds() {
    let assets = mesh_assets();
    let mut builder = SceneBuilder::new(&assets);
    let model = ModelDesc::new(
        "cube.obj",
        Transform::new(DVec3::new(2.0, 2.0, 0.1), DVec3::new(0.0, FRAC_PI_2, 0.0), DVec3::new(-2.0, 2.0, 0.0)),
        Material::new(),
    );
    let handle = builder.add_model(&model).unwrap();
    assert_eq!(handle.triangle_count, 12);

    let mesh = builder.buffers().mesh(handle.mesh_index).unwrap();
    let center = mesh.bounds.center();
    let half = mesh.bounds.half_extents();
    println!("center {center:?} half {half:?}");

    assert!((center - DVec3::new(-2.0, 2.0, 0.0)).length() < 1e-6);
    assert!((half - DVec3::new(0.05, 1.0, 1.0)).length() < 1e-6);
}

#[test]
fn test_cube_normals_are_unit_after_placement() {
    let assets = mesh_assets();
    let mut builder = SceneBuilder::new(&assets);
    let model = ModelDesc::new(
        "cube.obj",
        Transform::new(DVec3::new(3.0, 0.2, 1.0), DVec3::new(0.3, 1.1, -0.7), DVec3::ONE),
        Material::new(),
    );
    let handle = builder.add_model(&model).unwrap();

    for idx in handle.triangle_range() {
        let tri = builder.buffers().triangle(idx).unwrap();
        for n in tri.normals() {
            assert!((n.length() - 1.0).abs() < 1e-6, "{n:?}");
        }
        for p in tri.positions() {
            let bounds = builder.buffers().mesh(handle.mesh_index).unwrap().bounds;
            // f32 storage, so allow for narrowing.
            assert!(p.cmpge(bounds.min - 1e-5).all() && p.cmple(bounds.max + 1e-5).all());
        }
    }
}

#[test]
fn test_sample_scene() {
    let desc = SceneDesc::load(data_dir().join("scenes").join("room.json")).unwrap();
    let assets = mesh_assets();
    let mut builder = SceneBuilder::new(&assets);
    let report = builder.build_from_desc(&desc).unwrap();
    let buffers = builder.into_buffers();

    assert_eq!(report.models.len(), 2);
    assert_eq!(report.rooms.len(), 1);
    assert_eq!(report.rooms[0].len(), 7);
    assert_eq!(report.spheres, vec![1, 2]);

    // dummy + 2 models + 7 room parts
    assert_eq!(buffers.meshes().len(), 10);
    // dummy + pyramid (6) + cube (12) + 7 cubes
    assert_eq!(buffers.triangles().len(), 1 + 6 + 12 + 7 * 12);
    assert_eq!(buffers.triangles().as_floats().len(), buffers.triangles().len() * GpuTriangle::STRIDE);

    // Every mesh range lies inside the triangle array and ranges never overlap.
    let mut next_free = 1;
    for record in &buffers.meshes().records()[1..] {
        let mesh = decode_mesh(record);
        assert_eq!(mesh.first_triangle, next_free);
        next_free += mesh.triangle_count;
        assert!(mesh.bounds.min.cmple(mesh.bounds.max).all());
    }
    assert_eq!(next_free as usize, buffers.triangles().len());

    let light = buffers.mesh(report.rooms[0][6].mesh_index).unwrap();
    assert!(light.material.is_emissive());
}

#[test]
fn test_failed_build_leaves_buffers_untouched() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(data_dir().join("meshes").join("cube.obj"), dir.path().join("cube.obj")).unwrap();
    std::fs::write(dir.path().join("broken.obj"), "v 0 0 0\nv 1 0 0\nf 1 2 7\n").unwrap();
    let assets = FsAssets::new(dir.path());

    let mut builder = SceneBuilder::new(&assets);
    builder
        .add_room(&RoomDesc::new(DVec3::ZERO, DVec3::ONE, RoomMaterials::default()))
        .unwrap();
    let meshes_before = builder.buffers().meshes().as_bytes().to_vec();
    let triangles_before = builder.buffers().triangles().as_bytes().to_vec();

    let desc = SceneDesc {
        models: vec![
            ModelDesc::new("cube.obj", Transform::IDENTITY, Material::new()),
            ModelDesc::new("broken.obj", Transform::IDENTITY, Material::new()),
        ],
        ..Default::default()
    };
    let err = builder.build_from_desc(&desc).unwrap_err();
    assert!(err.to_string().contains("broken.obj"), "{err}");
    assert!(matches!(err, Error::Asset { .. }));

    assert_eq!(builder.buffers().meshes().as_bytes(), meshes_before.as_slice());
    assert_eq!(builder.buffers().triangles().as_bytes(), triangles_before.as_slice());
}

#[test]
fn test_mesh_record_slots() {
    let assets = mesh_assets();
    let mut builder = SceneBuilder::new(&assets);
    let material = Material::colored(Rgb::from_u8(255, 0, 0))
        .with_emission(Rgb::new(0.0, 0.5, 1.0), 2.0)
        .with_smoothness(0.25);
    builder
        .add_model(&ModelDesc::new("cube.obj", Transform::IDENTITY, material))
        .unwrap();

    let slots = &builder.buffers().meshes().as_floats()[GpuMesh::STRIDE..];
    assert_eq!(&slots[0..4], &[1.0, 12.0, 0.0, 0.0]);
    assert_eq!(&slots[4..8], &[-0.5, -0.5, -0.5, 0.0]);
    assert_eq!(&slots[8..12], &[0.5, 0.5, 0.5, 0.0]);
    assert_eq!(&slots[12..16], &[1.0, 0.0, 0.0, 0.0]);
    assert_eq!(&slots[16..20], &[0.0, 0.5, 1.0, 2.0]);
    assert_eq!(&slots[20..24], &[0.25, 0.0, 0.0, 0.0]);
}
