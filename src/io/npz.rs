// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! NPZ mesh container
//!
//! A zip archive of `.npy` arrays: `vertices` (V x 3), `faces` (F x k),
//! `texcoords` (T x 2), `texcoords_indices` (F x k) and `texture`
//! (H x W x 3, uint8, RGB). Vertex colors and normals are not stored.

use super::npy::{self, NpyArray};
use super::staged::StagedOutput;
use super::texture::{from_rgb8, to_rgb8};
use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh};
use image::RgbImage;
use nalgebra::{Point2, Point3};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub fn read_npz(path: &Path) -> Result<Mesh> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let vertices = read_array(&mut archive, "vertices")?
        .ok_or_else(|| Error::InvalidMesh("npz archive has no 'vertices' array".to_string()))?;
    let faces = read_array(&mut archive, "faces")?
        .ok_or_else(|| Error::InvalidMesh("npz archive has no 'faces' array".to_string()))?;
    let texcoords = read_array(&mut archive, "texcoords")?;
    let texture_indices = read_array(&mut archive, "texcoords_indices")?;
    let texture = read_array(&mut archive, "texture")?;

    let mesh = Mesh {
        vertices: points3(&vertices)?,
        faces: rows(&faces)?,
        texcoords: texcoords.as_ref().map(points2).transpose()?,
        texture_indices: texture_indices.as_ref().map(rows).transpose()?,
        texture: texture.as_ref().map(image_rgb).transpose()?,
        ..Mesh::default()
    };
    mesh.validate()?;

    Ok(mesh)
}

pub fn write_npz(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut output = StagedOutput::new();
    stage_npz(&mut output, path, mesh)?;
    output.commit()
}

pub(super) fn stage_npz(output: &mut StagedOutput, path: &Path, mesh: &Mesh) -> Result<()> {
    mesh.validate()?;
    let arity = uniform_arity(mesh)?;

    // Encode everything before touching the file system
    let mut arrays = vec![
        (
            "vertices",
            npy::encode(
                &[mesh.vertex_count(), 3],
                &mesh
                    .vertices
                    .iter()
                    .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                    .collect::<Vec<_>>(),
            ),
        ),
        ("faces", encode_rows(&mesh.faces, arity)?),
    ];

    if let Some(texcoords) = &mesh.texcoords {
        let flat: Vec<f32> = texcoords
            .iter()
            .flat_map(|t| [t.x as f32, t.y as f32])
            .collect();
        arrays.push(("texcoords", npy::encode(&[texcoords.len(), 2], &flat)));
    }
    if let Some(rows) = &mesh.texture_indices {
        arrays.push(("texcoords_indices", encode_rows(rows, arity)?));
    }
    if let Some(texture) = &mesh.texture {
        let rgb = to_rgb8(texture);
        let (width, height) = rgb.dimensions();
        arrays.push((
            "texture",
            npy::encode(&[height as usize, width as usize, 3], rgb.as_raw()),
        ));
    }

    let mut writer = ZipWriter::new(output.create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in arrays {
        writer.start_file(format!("{}.npy", name), options)?;
        writer.write_all(&bytes)?;
    }
    writer.finish()?;

    Ok(())
}

fn read_array<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<NpyArray>> {
    let mut entry = match archive.by_name(&format!("{}.npy", name)) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    npy::decode(&bytes).map(Some)
}

fn expect_columns(array: &NpyArray, columns: usize, what: &str) -> Result<usize> {
    match array.shape.as_slice() {
        [rows, cols] if *cols == columns => Ok(*rows),
        [0] if columns > 0 => Ok(0),
        shape => Err(Error::InvalidMesh(format!(
            "'{}' has shape {:?}, expected (n, {})",
            what, shape, columns
        ))),
    }
}

fn points3(array: &NpyArray) -> Result<Vec<Point3<f64>>> {
    expect_columns(array, 3, "vertices")?;
    Ok(array
        .to_f64()?
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn points2(array: &NpyArray) -> Result<Vec<Point2<f64>>> {
    expect_columns(array, 2, "texcoords")?;
    Ok(array
        .to_f64()?
        .chunks_exact(2)
        .map(|c| Point2::new(c[0], c[1]))
        .collect())
}

fn rows(array: &NpyArray) -> Result<Vec<Face>> {
    let arity = match array.shape.as_slice() {
        [_, cols] if *cols >= 3 => *cols,
        [0] => return Ok(Vec::new()),
        shape => {
            return Err(Error::InvalidMesh(format!(
                "index array has shape {:?}",
                shape
            )))
        }
    };
    Ok(array
        .to_indices()?
        .chunks_exact(arity)
        .map(<[usize]>::to_vec)
        .collect())
}

fn image_rgb(array: &NpyArray) -> Result<image::Rgb32FImage> {
    let (height, width) = match array.shape.as_slice() {
        [h, w, 3] => (*h as u32, *w as u32),
        shape => {
            return Err(Error::InvalidMesh(format!(
                "texture has shape {:?}, expected (h, w, 3)",
                shape
            )))
        }
    };
    let buffer = RgbImage::from_raw(width, height, array.to_u8()?)
        .ok_or_else(|| Error::InvalidMesh("texture buffer size mismatch".to_string()))?;
    Ok(from_rgb8(buffer))
}

fn uniform_arity(mesh: &Mesh) -> Result<usize> {
    let arity = mesh.faces.first().map_or(3, Vec::len);
    if mesh.faces.iter().any(|f| f.len() != arity) {
        return Err(Error::InvalidMesh(
            "npz stores faces of a single arity; the mesh mixes polygon sizes".to_string(),
        ));
    }
    Ok(arity)
}

fn encode_rows(rows: &[Face], arity: usize) -> Result<Vec<u8>> {
    let flat = rows
        .iter()
        .flatten()
        .map(|&i| {
            u32::try_from(i)
                .map_err(|_| Error::InvalidMesh(format!("index {} does not fit in uint32", i)))
        })
        .collect::<Result<Vec<u32>>>()?;
    Ok(npy::encode(&[rows.len(), arity], &flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use tempfile::TempDir;

    #[test]
    fn test_torus_round_trip() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("torus.npz");
        let mesh = Primitive::torus(2.0, 0.5, 8, 6).to_mesh();

        write_npz(&path, &mesh)?;
        let loaded = read_npz(&path)?;

        assert_eq!(loaded.faces, mesh.faces);
        assert_eq!(loaded.texture_indices, mesh.texture_indices);
        assert_eq!(loaded.texcoord_count(), mesh.texcoord_count());
        for (a, b) in loaded.vertices.iter().zip(&mesh.vertices) {
            assert!((a - b).norm() < 1e-5);
        }
        let texture = loaded.texture.expect("texture");
        assert_eq!(texture.dimensions(), (64, 64));
        assert!(loaded.vertex_colors.is_none());
        Ok(())
    }

    #[test]
    fn test_mixed_arity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut mesh = Primitive::unit_cube().to_mesh();
        mesh.faces.push(vec![0, 1, 2, 3]);

        let path = dir.path().join("mixed.npz");
        assert!(matches!(write_npz(&path, &mesh), Err(Error::InvalidMesh(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_vertices_array() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.npz");
        let mut writer = ZipWriter::new(File::create(&path)?);
        writer.start_file("faces.npy", SimpleFileOptions::default())?;
        writer.write_all(&npy::encode::<u32>(&[0, 3], &[]))?;
        writer.finish()?;

        assert!(matches!(read_npz(&path), Err(Error::InvalidMesh(_))));
        Ok(())
    }
}
