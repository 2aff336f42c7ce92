// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! I/O module - mesh codecs, landmark files and texture images

mod landmarks;
mod npy;
mod npz;
mod obj;
mod staged;
mod texture;

pub use landmarks::{read_landmarks, Landmarks};
pub use npz::{read_npz, write_npz};
pub use obj::{parse_obj, read_obj, write_obj, ObjWriteOptions, ParsedObj};
pub use staged::StagedOutput;
pub use texture::load_texture;

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use std::path::Path;

/// Mesh container formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Npz,
}

impl MeshFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("obj") => Ok(Self::Obj),
            Some("npz") => Ok(Self::Npz),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Npz => "npz",
        }
    }
}

/// Load a mesh, dispatching on the file extension
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    match MeshFormat::from_path(path)? {
        MeshFormat::Obj => read_obj(path),
        MeshFormat::Npz => read_npz(path),
    }
}

/// Save a mesh, dispatching on the file extension
pub fn save_mesh(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut output = StagedOutput::new();
    output.stage_mesh(path, mesh)?;
    output.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.obj")).unwrap(), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("scan.NPZ")).unwrap(), MeshFormat::Npz);
        assert!(matches!(
            MeshFormat::from_path(Path::new("mesh.ply")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(MeshFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_save_unsupported_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.stl");
        let mesh = crate::geometry::Primitive::unit_cube().to_mesh();
        assert!(save_mesh(&path, &mesh).is_err());
        assert!(!path.exists());
    }
}
