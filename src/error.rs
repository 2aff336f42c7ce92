// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Error taxonomy shared by the core engine, the samplers and the codecs

use crate::texture::RenderError;
use std::path::PathBuf;

/// Errors produced by partial-scan generation.
///
/// Every core operation fails fast with one of these; nothing is retried
/// internally. The binary wraps them with `anyhow` context.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The three points chosen for a cutting plane are collinear or coincide.
    #[error("cannot estimate a plane from collinear or coincident points")]
    DegeneratePlane,

    /// `cut` was asked to run without a usable landmark collection.
    #[error("landmarks unavailable: {0}")]
    MissingLandmarks(String),

    /// Malformed sampling parameters or an inconsistent argument combination.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A deletion index does not address a vertex of the mesh.
    #[error("vertex index {index} is out of range for a mesh with {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    /// The UV rasterizer failed while re-painting the texture atlas.
    #[error("texture repair failed: {0}")]
    TextureRepair(#[from] RenderError),

    /// The file extension does not name a supported mesh format.
    #[error("unsupported mesh format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The mesh violates one of its structural invariants.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A text or array file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::IndexOutOfRange { index: 12, len: 8 };
        assert_eq!(
            err.to_string(),
            "vertex index 12 is out of range for a mesh with 8 vertices"
        );

        let err = Error::UnsupportedFormat(PathBuf::from("mesh.stl"));
        assert_eq!(err.to_string(), "unsupported mesh format: mesh.stl");
    }

    #[test]
    fn test_render_error_converts_to_texture_repair() {
        let err: Error = RenderError::new("context lost").into();
        assert!(matches!(err, Error::TextureRepair(_)));
        assert!(err.to_string().contains("context lost"));
    }
}
