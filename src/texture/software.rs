// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! CPU rasterizer for UV triangles

use super::{RenderError, UvRenderer};
use image::Rgb32FImage;
use nalgebra::{Point2, Vector2};

/// Scanline-free bounding-box rasterizer running on the CPU.
///
/// A UV coordinate `(u, v)` lands on pixel `(u * W, (1 - v) * H)`, so `v = 1`
/// is the top row of the image. A pixel is covered when its center lies
/// inside a triangle, edges included.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareUvRenderer;

impl SoftwareUvRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl UvRenderer for SoftwareUvRenderer {
    fn render(
        &self,
        texcoords: &[Point2<f64>],
        triangles: &[[usize; 3]],
        source: &Rgb32FImage,
    ) -> Result<Rgb32FImage, RenderError> {
        let (width, height) = source.dimensions();
        let mut output = Rgb32FImage::new(width, height);

        if width == 0 || height == 0 {
            return Ok(output);
        }

        for (tri_idx, triangle) in triangles.iter().enumerate() {
            let mut points = [Vector2::zeros(); 3];
            for (corner, &index) in triangle.iter().enumerate() {
                let uv = texcoords.get(index).ok_or_else(|| {
                    RenderError::new(format!(
                        "triangle {} references texcoord {} of {}",
                        tri_idx,
                        index,
                        texcoords.len()
                    ))
                })?;
                points[corner] = Vector2::new(uv.x * width as f64, (1.0 - uv.y) * height as f64);
            }

            copy_triangle(source, &mut output, points);
        }

        Ok(output)
    }
}

fn copy_triangle(source: &Rgb32FImage, output: &mut Rgb32FImage, points: [Vector2<f64>; 3]) {
    let width = output.width() as i64;
    let height = output.height() as i64;

    let area = edge(points[0], points[1], points[2]);
    if area.abs() < 1e-12 {
        return;
    }

    let min_x = points
        .iter()
        .fold(f64::INFINITY, |acc, p| acc.min(p.x))
        .floor()
        .max(0.0) as i64;
    let max_x = points
        .iter()
        .fold(f64::NEG_INFINITY, |acc, p| acc.max(p.x))
        .ceil()
        .min((width - 1) as f64) as i64;
    let min_y = points
        .iter()
        .fold(f64::INFINITY, |acc, p| acc.min(p.y))
        .floor()
        .max(0.0) as i64;
    let max_y = points
        .iter()
        .fold(f64::NEG_INFINITY, |acc, p| acc.max(p.y))
        .ceil()
        .min((height - 1) as f64) as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vector2::new(x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(points[1], points[2], p);
            let w1 = edge(points[2], points[0], p);
            let w2 = edge(points[0], points[1], p);

            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);

            if inside {
                let (x, y) = (x as u32, y as u32);
                output.put_pixel(x, y, *source.get_pixel(x, y));
            }
        }
    }
}

fn edge(a: Vector2<f64>, b: Vector2<f64>, p: Vector2<f64>) -> f64 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}
