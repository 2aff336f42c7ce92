// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Texture atlas image I/O

use crate::error::Result;
use image::{DynamicImage, ImageFormat, Rgb32FImage, RgbImage};
use std::io::{Seek, Write};
use std::path::Path;

/// Load an image at any bit depth as RGB with channels in [0, 1]
pub fn load_texture(path: &Path) -> Result<Rgb32FImage> {
    Ok(image::open(path)?.into_rgb32f())
}

/// Encode an atlas as a 16-bit RGB PNG
pub(crate) fn write_texture_png16<W: Write + Seek>(writer: &mut W, texture: &Rgb32FImage) -> Result<()> {
    DynamicImage::ImageRgb32F(texture.clone())
        .into_rgb16()
        .write_to(writer, ImageFormat::Png)?;
    Ok(())
}

pub(crate) fn to_rgb8(texture: &Rgb32FImage) -> RgbImage {
    DynamicImage::ImageRgb32F(texture.clone()).into_rgb8()
}

pub(crate) fn from_rgb8(texture: RgbImage) -> Rgb32FImage {
    DynamicImage::ImageRgb8(texture).into_rgb32f()
}
