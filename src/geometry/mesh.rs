// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Textured polygon mesh representation

use crate::error::{Error, Result};
use image::Rgb32FImage;
use nalgebra::{Point2, Point3, Vector3};

/// One polygon: indices into the vertex table (arity >= 3)
pub type Face = Vec<usize>;

/// Polygon mesh with optional per-vertex attributes, a UV index space, an
/// independent normal index space and a texture atlas.
///
/// Per-corner index rows (`texture_indices`, `face_normal_indices`) are
/// shaped exactly like `faces`. Meshes are plain values: operations build new
/// meshes instead of patching existing ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    /// RGB color per vertex, aligned with `vertices`
    pub vertex_colors: Option<Vec<Vector3<f64>>>,
    /// Normal per vertex, aligned with `vertices`
    pub vertex_normals: Option<Vec<Vector3<f64>>>,
    pub faces: Vec<Face>,
    pub texcoords: Option<Vec<Point2<f64>>>,
    /// Per-corner indices into `texcoords`
    pub texture_indices: Option<Vec<Face>>,
    pub face_normals: Option<Vec<Vector3<f64>>>,
    /// Per-corner indices into `face_normals`
    pub face_normal_indices: Option<Vec<Face>>,
    /// UV atlas, channel values in [0, 1]
    pub texture: Option<Rgb32FImage>,
    pub material: Option<String>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::default()
        }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn texcoord_count(&self) -> usize {
        self.texcoords.as_ref().map_or(0, Vec::len)
    }

    pub fn normal_count(&self) -> usize {
        self.face_normals.as_ref().map_or(0, Vec::len)
    }

    /// True when the mesh carries everything needed to re-render its atlas
    pub fn has_uv_atlas(&self) -> bool {
        self.texture.is_some() && self.texcoords.is_some() && self.texture_indices.is_some()
    }

    /// True when every face is a triangle
    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|face| face.len() == 3)
    }

    /// Check every structural invariant of the mesh.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertex_count();

        check_attribute_len("vertex_colors", self.vertex_colors.as_deref(), vertex_count)?;
        check_attribute_len("vertex_normals", self.vertex_normals.as_deref(), vertex_count)?;

        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::InvalidMesh(format!(
                    "face {} has {} corners",
                    face_idx,
                    face.len()
                )));
            }
            check_row_bounds("faces", face_idx, face, vertex_count)?;
        }

        check_corner_space(
            "texture_indices",
            &self.faces,
            self.texture_indices.as_deref(),
            self.texcoords.as_ref().map(Vec::len),
        )?;
        check_corner_space(
            "face_normal_indices",
            &self.faces,
            self.face_normal_indices.as_deref(),
            self.face_normals.as_ref().map(Vec::len),
        )?;

        Ok(())
    }
}

/// Fan-triangulate one polygon row: `[a, b, c, d]` -> `[a, b, c], [a, c, d]`.
pub fn fan_triangles(row: &[usize]) -> impl Iterator<Item = [usize; 3]> + '_ {
    (1..row.len().saturating_sub(1)).map(move |i| [row[0], row[i], row[i + 1]])
}

fn check_attribute_len<T>(name: &str, attribute: Option<&[T]>, vertex_count: usize) -> Result<()> {
    match attribute {
        Some(values) if values.len() != vertex_count => Err(Error::InvalidMesh(format!(
            "{} has {} entries for {} vertices",
            name,
            values.len(),
            vertex_count
        ))),
        _ => Ok(()),
    }
}

fn check_row_bounds(name: &str, row_idx: usize, row: &[usize], bound: usize) -> Result<()> {
    match row.iter().find(|&&index| index >= bound) {
        Some(index) => Err(Error::InvalidMesh(format!(
            "{} row {} references index {} of {}",
            name, row_idx, index, bound
        ))),
        None => Ok(()),
    }
}

fn check_corner_space(
    name: &str,
    faces: &[Face],
    rows: Option<&[Face]>,
    table_len: Option<usize>,
) -> Result<()> {
    let rows = match rows {
        Some(rows) => rows,
        None => return Ok(()),
    };
    let table_len = table_len
        .ok_or_else(|| Error::InvalidMesh(format!("{} present without its value table", name)))?;

    if rows.len() != faces.len() {
        return Err(Error::InvalidMesh(format!(
            "{} has {} rows for {} faces",
            name,
            rows.len(),
            faces.len()
        )));
    }

    for (row_idx, (row, face)) in rows.iter().zip(faces).enumerate() {
        if row.len() != face.len() {
            return Err(Error::InvalidMesh(format!(
                "{} row {} has {} corners, face has {}",
                name,
                row_idx,
                row.len(),
                face.len()
            )));
        }
        check_row_bounds(name, row_idx, row, table_len)?;
    }

    Ok(())
}
