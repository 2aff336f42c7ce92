// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Round-trip tests for the mesh codecs, landmark files and configuration

use anyhow::Result;
use partialscan::geometry::Primitive;
use partialscan::io::{self, write_obj, ObjWriteOptions};
use partialscan::{remove_points, GeneratorConfig, SampleRange, SoftwareUvRenderer};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_obj_roundtrip_torus() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("torus.obj");
    let mesh = Primitive::torus(2.0, 0.5, 8, 6).to_mesh();

    io::save_mesh(&path, &mesh)?;
    assert!(dir.path().join("torus.mtl").exists());
    assert!(dir.path().join("torus.png").exists());

    let loaded = io::load_mesh(&path)?;
    assert_eq!(loaded.vertices, mesh.vertices);
    assert_eq!(loaded.faces, mesh.faces);
    assert_eq!(loaded.texcoords, mesh.texcoords);
    assert_eq!(loaded.texture_indices, mesh.texture_indices);
    assert_eq!(loaded.vertex_colors, mesh.vertex_colors);
    assert_eq!(loaded.material.as_deref(), Some("material_0"));

    // Normal rows repeat the vertex rows, so they come back as vertex normals
    assert_eq!(loaded.vertex_normals, mesh.face_normals);
    assert!(loaded.face_normal_indices.is_none());

    let texture = loaded.texture.expect("texture");
    assert_eq!(texture.dimensions(), (64, 64));
    Ok(())
}

#[test]
fn test_obj_roundtrip_after_subset() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("grid.obj");
    let mesh = Primitive::grid(5, 4).to_mesh();
    let sub = remove_points(&mesh, &[0, 7, 13], true, &SoftwareUvRenderer)?;

    io::save_mesh(&path, &sub)?;
    let loaded = io::load_mesh(&path)?;

    assert_eq!(loaded.vertices, sub.vertices);
    assert_eq!(loaded.faces, sub.faces);
    assert_eq!(loaded.texcoords, sub.texcoords);
    assert_eq!(loaded.texture_indices, sub.texture_indices);
    assert!(!loaded.is_triangulated());
    Ok(())
}

#[test]
fn test_obj_highlight() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cube.obj");
    let mesh = Primitive::unit_cube().to_mesh();

    write_obj(&path, &mesh, &ObjWriteOptions::with_highlight([0, 6]))?;
    let loaded = io::load_mesh(&path)?;
    let colors = loaded.vertex_colors.expect("colors");

    assert_eq!(colors[0].x, 1.0);
    assert_eq!(colors[0].y, 0.0);
    assert_eq!(colors[1].y, 1.0);
    assert_eq!(colors[6].z, 0.0);
    // Untextured meshes have no sidecar files
    assert!(!dir.path().join("cube.mtl").exists());
    Ok(())
}

#[test]
fn test_obj_missing_texture_is_not_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("scan.obj");
    fs::write(
        &path,
        "mtllib scan.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n",
    )?;
    fs::write(dir.path().join("scan.mtl"), "newmtl material_0\nmap_Kd missing.png\n")?;

    let mesh = io::load_mesh(&path)?;
    assert!(mesh.texture.is_none());
    assert_eq!(mesh.texcoord_count(), 3);
    Ok(())
}

#[test]
fn test_convert_obj_to_npz() -> Result<()> {
    let dir = TempDir::new()?;
    let obj = dir.path().join("torus.obj");
    let npz = dir.path().join("torus.npz");
    let mesh = Primitive::torus(2.0, 0.5, 10, 5).to_mesh();

    io::save_mesh(&obj, &mesh)?;
    let loaded = io::load_mesh(&obj)?;
    io::save_mesh(&npz, &loaded)?;
    let converted = io::load_mesh(&npz)?;

    assert_eq!(converted.faces, mesh.faces);
    assert_eq!(converted.texture_indices, mesh.texture_indices);
    assert_eq!(converted.vertex_count(), mesh.vertex_count());
    assert!(converted.texture.is_some());
    Ok(())
}

#[test]
fn test_read_landmark_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("landmarks3d.txt");
    fs::write(&path, "nose 0.1 1.6 0.12\nleft_eye -0.03 1.65 0.1\n")?;

    let landmarks = io::read_landmarks(&path)?;
    assert_eq!(landmarks.len(), 2);
    assert_eq!(landmarks.get("nose").map(|p| p.y), Some(1.6));
    Ok(())
}

#[test]
fn test_config_roundtrip() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("partialscan.toml");

    let config = GeneratorConfig {
        holes: SampleRange::Fixed(4),
        dropout: SampleRange::Uniform(0.02, 0.03),
        landmark_names: vec!["nose".to_string(), "chin".to_string(), "neck".to_string()],
        seed: Some(123),
        ..GeneratorConfig::default()
    };
    config.save(&path)?;

    let loaded = GeneratorConfig::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}
