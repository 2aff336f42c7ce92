// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Texture atlas services: the UV rasterizer capability and seam dilation

mod dilate;
mod software;

pub use dilate::dilate_3x3;
pub use software::SoftwareUvRenderer;

use image::Rgb32FImage;
use nalgebra::Point2;

/// Failure reported by a [`UvRenderer`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Paints UV triangles of a source atlas into a fresh image.
///
/// The output has the resolution of `source`. Pixels covered by one of the
/// listed triangles (in UV space) carry the source color, every other pixel is
/// zero. Calls block until the image is ready and cannot be cancelled.
pub trait UvRenderer {
    fn render(
        &self,
        texcoords: &[Point2<f64>],
        triangles: &[[usize; 3]],
        source: &Rgb32FImage,
    ) -> Result<Rgb32FImage, RenderError>;
}

impl<T: UvRenderer + ?Sized> UvRenderer for &T {
    fn render(
        &self,
        texcoords: &[Point2<f64>],
        triangles: &[[usize; 3]],
        source: &Rgb32FImage,
    ) -> Result<Rgb32FImage, RenderError> {
        (**self).render(texcoords, triangles, source)
    }
}
