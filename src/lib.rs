// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Partialscan
//!
//! Synthesizes partial 3D surface scans from complete textured meshes for
//! shape-completion datasets. A mesh is either cut in two along a plane
//! through three body landmarks, or has random localized holes shot into
//! it. Both strategies end in the subset engine, which removes a vertex set
//! and re-derives faces, texture and normal index spaces and the texture
//! atlas so the result is self-consistent.

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod partial;
pub mod sampling;
pub mod texture;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use geometry::{
    classify_by_plane, estimate_plane, remove_points, Mesh, Plane, PlanePartition, Primitive,
    SubsetEngine,
};
pub use io::{load_mesh, read_landmarks, save_mesh, Landmarks};
pub use partial::{HoleShot, PartialShapeGenerator, PlaneCut};
pub use sampling::{shoot_holes, HoleParams, SampleRange};
pub use texture::{SoftwareUvRenderer, UvRenderer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cube_split() {
        let mesh = Primitive::unit_cube().to_mesh();
        let plane = Plane::new(nalgebra::Point3::origin(), nalgebra::Vector3::x());
        let partition = classify_by_plane(&mesh.vertices, &plane);

        let first = remove_points(&mesh, &partition.front, false, &SoftwareUvRenderer).unwrap();
        let second = remove_points(&mesh, &partition.back, false, &SoftwareUvRenderer).unwrap();
        assert_eq!(first.vertex_count() + second.vertex_count(), 8);
        assert!(first.face_count() + second.face_count() <= 12);
    }
}
