// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Morphological dilation used to close rasterization seams

use image::{Rgb, Rgb32FImage};

/// One pass of grayscale dilation with a 3x3 square kernel, per channel.
///
/// Each output channel is the maximum of that channel over the pixel and its
/// eight neighbors; the border is handled by ignoring out-of-image pixels.
pub fn dilate_3x3(image: &Rgb32FImage) -> Rgb32FImage {
    let (width, height) = image.dimensions();

    Rgb32FImage::from_fn(width, height, |x, y| {
        let mut max = [f32::NEG_INFINITY; 3];

        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let pixel = image.get_pixel(nx, ny);
                for c in 0..3 {
                    max[c] = max[c].max(pixel[c]);
                }
            }
        }

        Rgb(max)
    })
}
