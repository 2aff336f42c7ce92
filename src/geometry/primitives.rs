// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Reference meshes for tests, benchmarks and smoke runs

use super::{Face, Mesh};
use image::{Rgb, Rgb32FImage};
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::PI;

const TEXTURE_SIZE: u32 = 64;

/// Procedural reference meshes
pub enum Primitive {
    /// Unit cube centered at the origin: 8 vertices, 12 triangles, untextured
    UnitCube,
    /// Planar grid of quads in the XY plane with a per-vertex UV atlas
    Grid { nx: usize, ny: usize },
    /// Closed torus with a seamed UV atlas and a per-corner normal space
    Torus {
        major: f64,
        minor: f64,
        segments_u: usize,
        segments_v: usize,
    },
}

impl Primitive {
    pub fn unit_cube() -> Self {
        Self::UnitCube
    }

    pub fn grid(nx: usize, ny: usize) -> Self {
        Self::Grid {
            nx: nx.max(1),
            ny: ny.max(1),
        }
    }

    pub fn torus(major: f64, minor: f64, segments_u: usize, segments_v: usize) -> Self {
        Self::Torus {
            major,
            minor,
            segments_u: segments_u.max(3),
            segments_v: segments_v.max(3),
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::UnitCube => generate_cube_mesh(),
            Self::Grid { nx, ny } => generate_grid_mesh(*nx, *ny),
            Self::Torus {
                major,
                minor,
                segments_u,
                segments_v,
            } => generate_torus_mesh(*major, *minor, *segments_u, *segments_v),
        }
    }
}

/// Checkerboard atlas with `cells` squares per side, never pure black
pub fn checker_texture(size: u32, cells: u32) -> Rgb32FImage {
    let cell = (size / cells.max(1)).max(1);
    Rgb32FImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgb([0.9, 0.6, 0.3])
        } else {
            Rgb([0.2, 0.4, 0.8])
        }
    })
}

fn generate_cube_mesh() -> Mesh {
    let vertices = vec![
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(0.5, 0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, 0.5),
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(-0.5, 0.5, 0.5),
    ];

    // Two outward-facing triangles per side
    let faces = vec![
        vec![0, 2, 1],
        vec![0, 3, 2],
        vec![4, 5, 6],
        vec![4, 6, 7],
        vec![0, 1, 5],
        vec![0, 5, 4],
        vec![3, 7, 6],
        vec![3, 6, 2],
        vec![0, 4, 7],
        vec![0, 7, 3],
        vec![1, 2, 6],
        vec![1, 6, 5],
    ];

    Mesh::new(vertices, faces)
}

fn generate_grid_mesh(nx: usize, ny: usize) -> Mesh {
    let row = nx + 1;
    let mut vertices = Vec::with_capacity(row * (ny + 1));
    let mut texcoords = Vec::with_capacity(row * (ny + 1));
    let mut colors = Vec::with_capacity(row * (ny + 1));

    for j in 0..=ny {
        for i in 0..=nx {
            let u = i as f64 / nx as f64;
            let v = j as f64 / ny as f64;
            vertices.push(Point3::new(u, v, 0.0));
            texcoords.push(Point2::new(u, v));
            colors.push(Vector3::new(u, v, 0.5));
        }
    }

    let mut faces: Vec<Face> = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let a = j * row + i;
            faces.push(vec![a, a + 1, a + row + 1, a + row]);
        }
    }

    Mesh {
        vertices,
        vertex_colors: Some(colors),
        texcoords: Some(texcoords),
        // One UV per vertex, so the corner rows equal the faces
        texture_indices: Some(faces.clone()),
        faces,
        texture: Some(checker_texture(TEXTURE_SIZE, 8)),
        material: Some("material_0".to_string()),
        ..Mesh::default()
    }
}

fn generate_torus_mesh(major: f64, minor: f64, segments_u: usize, segments_v: usize) -> Mesh {
    let vertex_id = |i: usize, j: usize| (i % segments_u) * segments_v + (j % segments_v);
    let texcoord_id = |i: usize, j: usize| i * (segments_v + 1) + j;

    let mut vertices = Vec::with_capacity(segments_u * segments_v);
    let mut normals = Vec::with_capacity(segments_u * segments_v);
    for i in 0..segments_u {
        let theta = 2.0 * PI * i as f64 / segments_u as f64;
        for j in 0..segments_v {
            let phi = 2.0 * PI * j as f64 / segments_v as f64;
            let normal = Vector3::new(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin());
            let ring_center = Vector3::new(major * theta.cos(), major * theta.sin(), 0.0);
            vertices.push(Point3::from(ring_center + normal * minor));
            normals.push(normal);
        }
    }

    // The atlas is seamed: the last row and column repeat the first vertices
    let mut texcoords = Vec::with_capacity((segments_u + 1) * (segments_v + 1));
    for i in 0..=segments_u {
        for j in 0..=segments_v {
            texcoords.push(Point2::new(
                i as f64 / segments_u as f64,
                j as f64 / segments_v as f64,
            ));
        }
    }

    let mut faces = Vec::with_capacity(2 * segments_u * segments_v);
    let mut texture_indices = Vec::with_capacity(2 * segments_u * segments_v);
    for i in 0..segments_u {
        for j in 0..segments_v {
            let quad = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
            for tri in [[0, 1, 2], [0, 2, 3]] {
                faces.push(tri.iter().map(|&k| vertex_id(quad[k].0, quad[k].1)).collect());
                texture_indices.push(tri.iter().map(|&k| texcoord_id(quad[k].0, quad[k].1)).collect());
            }
        }
    }

    let colors = vertices
        .iter()
        .map(|p| Vector3::new(0.5 + 0.5 * p.x / major, 0.5 + 0.5 * p.y / major, 0.5))
        .collect();

    Mesh {
        vertices,
        vertex_colors: Some(colors),
        // Normals live in their own index space, one entry per vertex
        face_normal_indices: Some(faces.clone()),
        face_normals: Some(normals),
        faces,
        texcoords: Some(texcoords),
        texture_indices: Some(texture_indices),
        texture: Some(checker_texture(TEXTURE_SIZE, 8)),
        material: Some("material_0".to_string()),
        ..Mesh::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = Primitive::unit_cube().to_mesh();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.is_triangulated());
        assert!(mesh.texture.is_none());
    }

    #[test]
    fn test_grid_counts() {
        let mesh = Primitive::grid(4, 3).to_mesh();
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.texcoord_count(), 20);
        assert!(!mesh.is_triangulated());
        assert!(mesh.has_uv_atlas());
    }

    #[test]
    fn test_torus_is_closed_with_valence_six() {
        let mesh = Primitive::torus(2.0, 0.5, 8, 6).to_mesh();
        assert_eq!(mesh.vertex_count(), 48);
        assert_eq!(mesh.face_count(), 96);
        assert_eq!(mesh.texcoord_count(), 63);
        assert_eq!(mesh.normal_count(), 48);

        let mut valence = vec![0; mesh.vertex_count()];
        for face in &mesh.faces {
            for &v in face {
                valence[v] += 1;
            }
        }
        assert!(valence.iter().all(|&n| n == 6));
    }
}
