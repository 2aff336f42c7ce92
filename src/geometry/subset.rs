// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Mesh subset engine
//!
//! Removes an arbitrary set of vertices from a mesh and re-derives every
//! dependent structure: per-vertex attributes, faces, the texture coordinate
//! and normal index spaces, and optionally the texture atlas. All index
//! spaces of the result are dense and free of dangling references.

use super::{fan_triangles, Face, IndexCompaction, Mesh};
use crate::error::{Error, Result};
use crate::logging;
use crate::texture::{dilate_3x3, RenderError, UvRenderer};
use image::Rgb32FImage;
use slog::{debug, o, Logger};

/// Subset engine bound to a renderer and a logger
pub struct SubsetEngine<'r> {
    log: Logger,
    renderer: &'r dyn UvRenderer,
    repair_texture: bool,
}

impl<'r> SubsetEngine<'r> {
    /// Create an engine that repairs texture atlases with `renderer`
    pub fn new(log: &Logger, renderer: &'r dyn UvRenderer) -> Self {
        Self {
            log: log.new(o!("module" => "subset")),
            renderer,
            repair_texture: true,
        }
    }

    /// Enable or disable texture atlas repair
    pub fn with_texture_repair(mut self, enabled: bool) -> Self {
        self.repair_texture = enabled;
        self
    }

    /// Build the sub-mesh made of every vertex not listed in `deletion`.
    ///
    /// Atlas repair runs only when requested and when the mesh has a texture,
    /// texture coordinates and texture indices; otherwise the source texture
    /// is carried over unchanged.
    pub fn remove_points(&self, mesh: &Mesh, deletion: &[usize]) -> Result<Mesh> {
        let submesh = subset_geometry(mesh, deletion)?;

        debug!(self.log, "subset geometry";
            "vertices" => format!("{} -> {}", mesh.vertex_count(), submesh.vertex_count()),
            "faces" => format!("{} -> {}", mesh.face_count(), submesh.face_count()),
            "texcoords" => format!("{} -> {}", mesh.texcoord_count(), submesh.texcoord_count()),
            "normals" => format!("{} -> {}", mesh.normal_count(), submesh.normal_count()));

        match &mesh.texture {
            Some(source) if self.repair_texture && mesh.has_uv_atlas() => {
                let (width, height) = source.dimensions();
                debug!(self.log, "repairing texture atlas"; "width" => width, "height" => height);
                repair_texture(submesh, source, self.renderer)
            }
            _ => Ok(Mesh {
                texture: mesh.texture.clone(),
                ..submesh
            }),
        }
    }
}

/// Remove `deletion` from `mesh`, repairing the atlas with `renderer` when
/// `repair` is set. See [`SubsetEngine::remove_points`].
pub fn remove_points(
    mesh: &Mesh,
    deletion: &[usize],
    repair: bool,
    renderer: &dyn UvRenderer,
) -> Result<Mesh> {
    SubsetEngine::new(&logging::discard(), renderer)
        .with_texture_repair(repair)
        .remove_points(mesh, deletion)
}

/// Vertex, face and corner-space part of the subset; the result has no texture.
///
/// A face survives only if none of its vertices is deleted. Texture
/// coordinates and normals that are no longer referenced by a surviving face
/// are pruned, and every index row is rewritten into the compacted spaces.
pub fn subset_geometry(mesh: &Mesh, deletion: &[usize]) -> Result<Mesh> {
    mesh.validate()?;

    let vertex_count = mesh.vertex_count();
    let mut keep = vec![true; vertex_count];
    for &index in deletion {
        match keep.get_mut(index) {
            Some(slot) => *slot = false,
            None => {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: vertex_count,
                })
            }
        }
    }

    let vertex_map = IndexCompaction::from_retained(&keep);
    let vertices = vertex_map.gather(&mesh.vertices)?;
    let vertex_colors = mesh
        .vertex_colors
        .as_deref()
        .map(|colors| vertex_map.gather(colors))
        .transpose()?;
    let vertex_normals = mesh
        .vertex_normals
        .as_deref()
        .map(|normals| vertex_map.gather(normals))
        .transpose()?;

    // Whole-face policy: no clipping, a face with any deleted corner is gone
    let kept_faces: Vec<usize> = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|(_, face)| face.iter().all(|&v| keep[v]))
        .map(|(face_idx, _)| face_idx)
        .collect();
    let faces = vertex_map.remap_rows(kept_faces.iter().map(|&face_idx| &mesh.faces[face_idx]))?;

    let (texcoords, texture_indices) = compact_corner_space(
        mesh.texcoords.as_deref(),
        mesh.texture_indices.as_deref(),
        &kept_faces,
    )?;
    let (face_normals, face_normal_indices) = compact_corner_space(
        mesh.face_normals.as_deref(),
        mesh.face_normal_indices.as_deref(),
        &kept_faces,
    )?;

    Ok(Mesh {
        vertices,
        vertex_colors,
        vertex_normals,
        faces,
        texcoords,
        texture_indices,
        face_normals,
        face_normal_indices,
        texture: None,
        material: mesh.material.clone(),
    })
}

/// Re-paint the atlas of `submesh` from `source`, keeping only the regions
/// its texture indices still reference, then close seams with one 3x3
/// dilation pass.
///
/// On renderer failure nothing is returned; the caller keeps whatever
/// geometry it already had.
pub fn repair_texture(
    submesh: Mesh,
    source: &Rgb32FImage,
    renderer: &dyn UvRenderer,
) -> Result<Mesh> {
    let texcoords = submesh.texcoords.as_deref().unwrap_or(&[]);
    let triangles: Vec<[usize; 3]> = submesh
        .texture_indices
        .iter()
        .flatten()
        .flat_map(|row| fan_triangles(row))
        .collect();

    let rendered = renderer.render(texcoords, &triangles, source)?;
    if rendered.dimensions() != source.dimensions() {
        return Err(Error::TextureRepair(RenderError::new(format!(
            "renderer produced {:?} for a {:?} atlas",
            rendered.dimensions(),
            source.dimensions()
        ))));
    }

    Ok(Mesh {
        texture: Some(dilate_3x3(&rendered)),
        ..submesh
    })
}

/// Compact one per-corner index space (texture coordinates or normals) to
/// the entries still referenced by the kept faces.
fn compact_corner_space<T: Clone>(
    table: Option<&[T]>,
    rows: Option<&[Face]>,
    kept_faces: &[usize],
) -> Result<(Option<Vec<T>>, Option<Vec<Face>>)> {
    let (table, rows) = match (table, rows) {
        (Some(table), Some(rows)) => (table, rows),
        // A table without index rows has nothing to prune against
        (table, _) => return Ok((table.map(<[T]>::to_vec), None)),
    };

    let kept_rows: Vec<&Face> = kept_faces.iter().map(|&face_idx| &rows[face_idx]).collect();
    let compaction = IndexCompaction::from_references(
        table.len(),
        kept_rows.iter().flat_map(|row| row.iter().copied()),
    )?;

    let new_table = compaction.gather(table)?;
    let new_rows = compaction.remap_rows(kept_rows.iter().copied())?;

    Ok((Some(new_table), Some(new_rows)))
}
