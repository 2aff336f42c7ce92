// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! All-or-nothing output
//!
//! Every file is first written to a temporary beside its target. Targets are
//! only touched by `commit`; dropping an uncommitted `StagedOutput` removes
//! the temporaries.

use super::{npz, obj, MeshFormat, ObjWriteOptions};
use crate::error::Result;
use crate::geometry::Mesh;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A set of output files written together
#[derive(Debug, Default)]
pub struct StagedOutput {
    files: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a mesh in the format named by the extension of `path`
    pub fn stage_mesh(&mut self, path: &Path, mesh: &Mesh) -> Result<()> {
        match MeshFormat::from_path(path)? {
            MeshFormat::Obj => obj::stage_obj(self, path, mesh, &ObjWriteOptions::default()),
            MeshFormat::Npz => npz::stage_npz(self, path, mesh),
        }
    }

    /// Stage an OBJ (plus MTL and texture) with explicit writer options
    pub fn stage_obj(&mut self, path: &Path, mesh: &Mesh, options: &ObjWriteOptions) -> Result<()> {
        obj::stage_obj(self, path, mesh, options)
    }

    /// Targets staged so far, in staging order
    pub fn targets(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(_, target)| target.as_path())
    }

    /// Open a temporary file that replaces `target` on commit.
    pub(crate) fn create(&mut self, target: &Path) -> Result<&mut NamedTempFile> {
        let dir = match target.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir
            }
            None => Path::new("."),
        };

        let file = tempfile::Builder::new()
            .prefix(".partialscan-")
            .tempfile_in(dir)?;
        self.files.push((file, target.to_path_buf()));

        let last = self.files.len() - 1;
        Ok(&mut self.files[last].0)
    }

    /// Move every staged file onto its target.
    pub fn commit(self) -> Result<()> {
        for (file, target) in self.files {
            file.persist(&target).map_err(|e| e.error)?;
        }
        Ok(())
    }
}
