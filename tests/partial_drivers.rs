// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Cut and shoot drivers end to end on procedural meshes

use anyhow::Result;
use image::Rgb32FImage;
use nalgebra::{Point2, Point3};
use partialscan::geometry::Primitive;
use partialscan::io::{self, ObjWriteOptions, StagedOutput};
use partialscan::texture::RenderError;
use partialscan::{
    logging, Error, GeneratorConfig, Landmarks, PartialShapeGenerator, SampleRange,
    SoftwareUvRenderer, UvRenderer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

struct BrokenRenderer;

impl UvRenderer for BrokenRenderer {
    fn render(
        &self,
        _texcoords: &[Point2<f64>],
        _triangles: &[[usize; 3]],
        _source: &Rgb32FImage,
    ) -> std::result::Result<Rgb32FImage, RenderError> {
        Err(RenderError::new("device lost"))
    }
}

fn torus_landmarks() -> Landmarks {
    Landmarks::parse(
        "\
top 0.0 0.0 0.5
outer_x 2.5 0.0 0.0
outer_y 0.0 2.5 0.0
inner_x -1.5 0.0 0.0
bottom 0.0 0.0 -0.5
",
    )
    .expect("landmarks")
}

fn generator(seed: u64, renderer: &dyn UvRenderer) -> PartialShapeGenerator<'_, StdRng> {
    PartialShapeGenerator::new(
        &logging::discard(),
        StdRng::seed_from_u64(seed),
        renderer,
        GeneratorConfig::default(),
    )
}

#[test]
fn test_cut_produces_complementary_slices() -> Result<()> {
    let mesh = Primitive::torus(2.0, 0.5, 24, 12).to_mesh();
    let landmarks = torus_landmarks();
    let mut generator = generator(1, &SoftwareUvRenderer);

    let cut = generator.cut(&mesh, Some(&landmarks))?;
    cut.first.validate()?;
    cut.second.validate()?;

    assert_eq!(cut.first.vertex_count() + cut.second.vertex_count(), mesh.vertex_count());
    assert!(cut.first.face_count() + cut.second.face_count() <= mesh.face_count());
    assert!(cut.first.texture.is_some());

    // The first slice holds exactly the back side of the plane
    for p in &cut.first.vertices {
        assert!(p.coords.dot(&cut.plane.normal) < cut.plane.offset());
    }
    for name in &cut.landmarks {
        assert!(landmarks.get(name).is_some());
    }
    Ok(())
}

#[test]
fn test_cut_needs_landmarks() {
    let mesh = Primitive::unit_cube().to_mesh();
    let mut generator = generator(2, &SoftwareUvRenderer);

    assert!(matches!(generator.cut(&mesh, None), Err(Error::MissingLandmarks(_))));

    let two = Landmarks::parse("a 0 0 0\nb 1 0 0\n").expect("landmarks");
    assert!(matches!(
        generator.cut(&mesh, Some(&two)),
        Err(Error::MissingLandmarks(_))
    ));
}

#[test]
fn test_cut_through_collinear_landmarks() {
    let mesh = Primitive::unit_cube().to_mesh();
    let line = Landmarks::parse("a 0 0 0\nb 1 1 1\nc 2 2 2\n").expect("landmarks");
    let mut generator = generator(3, &SoftwareUvRenderer);

    assert!(matches!(
        generator.cut(&mesh, Some(&line)),
        Err(Error::DegeneratePlane)
    ));
}

#[test]
fn test_landmark_pool_limits_choice() -> Result<()> {
    let mesh = Primitive::torus(2.0, 0.5, 12, 6).to_mesh();
    let mut landmarks = torus_landmarks();
    landmarks.insert("far_away", Point3::new(100.0, 100.0, 100.0));

    let config = GeneratorConfig {
        landmark_pool: 5,
        ..GeneratorConfig::default()
    };
    for seed in 0..10 {
        let mut generator = PartialShapeGenerator::new(
            &logging::discard(),
            StdRng::seed_from_u64(seed),
            &SoftwareUvRenderer,
            config.clone(),
        );
        let cut = generator.cut(&mesh, Some(&landmarks))?;
        assert!(!cut.landmarks.iter().any(|n| n == "far_away"));
    }
    Ok(())
}

#[test]
fn test_shoot_removes_reported_vertices() -> Result<()> {
    let mesh = Primitive::torus(2.0, 0.5, 40, 25).to_mesh();
    let mut generator = generator(4, &SoftwareUvRenderer);

    let shot = generator.shoot(&mesh)?;
    shot.mesh.validate()?;

    assert!(!shot.removed.is_empty());
    assert_eq!(shot.mesh.vertex_count(), mesh.vertex_count() - shot.removed.len());
    assert!(shot.mesh.face_count() < mesh.face_count());

    let report = serde_json::to_value(shot.report())?;
    assert_eq!(report["removed"], shot.removed.len());
    Ok(())
}

#[test]
fn test_shoot_with_highlight_commits_both_files() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("shot.npz");
    let highlight = dir.path().join("highlight.obj");
    let mesh = Primitive::torus(2.0, 0.5, 24, 12).to_mesh();
    let shot = generator(5, &SoftwareUvRenderer).shoot(&mesh)?;

    let mut staged = StagedOutput::new();
    staged.stage_mesh(&output, &shot.mesh)?;
    staged.stage_obj(
        &highlight,
        &mesh,
        &ObjWriteOptions::with_highlight(shot.removed.iter().copied()),
    )?;
    assert!(!output.exists() && !highlight.exists());
    staged.commit()?;

    assert_eq!(io::load_mesh(&output)?.vertex_count(), shot.mesh.vertex_count());
    let painted = io::load_mesh(&highlight)?;
    let colors = painted.vertex_colors.expect("colors");
    assert_eq!(colors.len(), mesh.vertex_count());
    for (i, color) in colors.iter().enumerate() {
        let red = color.x == 1.0 && color.y == 0.0 && color.z == 0.0;
        assert_eq!(red, shot.removed.contains(&i), "vertex {}", i);
    }
    Ok(())
}

#[test]
fn test_same_seed_same_result() -> Result<()> {
    let mesh = Primitive::torus(2.0, 0.5, 24, 12).to_mesh();
    let landmarks = torus_landmarks();

    let mut a = generator(77, &SoftwareUvRenderer);
    let mut b = generator(77, &SoftwareUvRenderer);

    assert_eq!(a.shoot(&mesh)?.removed, b.shoot(&mesh)?.removed);

    let cut_a = a.cut(&mesh, Some(&landmarks))?;
    let cut_b = b.cut(&mesh, Some(&landmarks))?;
    assert_eq!(cut_a.plane, cut_b.plane);
    assert_eq!(cut_a.first, cut_b.first);
    Ok(())
}

#[test]
fn test_renderer_failure_propagates() {
    let mesh = Primitive::grid(8, 8).to_mesh();
    let mut generator = generator(5, &BrokenRenderer);
    assert!(matches!(generator.shoot(&mesh), Err(Error::TextureRepair(_))));
}

#[test]
fn test_texture_repair_can_be_disabled() -> Result<()> {
    let mesh = Primitive::grid(8, 8).to_mesh();
    let config = GeneratorConfig {
        repair_texture: false,
        holes: SampleRange::Fixed(2),
        ..GeneratorConfig::default()
    };
    let mut generator =
        PartialShapeGenerator::new(&logging::discard(), StdRng::seed_from_u64(6), &BrokenRenderer, config);

    let shot = generator.shoot(&mesh)?;
    assert_eq!(shot.mesh.texture, mesh.texture);
    Ok(())
}
