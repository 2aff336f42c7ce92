// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Cutting planes: estimation from three points and point classification

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Relative tolerance below which three points are treated as collinear
const COLLINEAR_EPS: f64 = 1e-10;

/// Plane through `center` with (not necessarily unit) `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub center: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Which side of a plane a point falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// On the plane or on the side the normal points to
    Front,
    Back,
}

/// Disjoint, complete split of a point set by a plane
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanePartition {
    /// Ascending indices of points with `dot(p, n) >= dot(c, n)`
    pub front: Vec<usize>,
    /// Ascending indices of every other point
    pub back: Vec<usize>,
}

impl Plane {
    pub fn new(center: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { center, normal }
    }

    /// Plane through the centroid of three points, normal `(b - a) x (c - a)`.
    pub fn through_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Result<Self> {
        let ab = b - a;
        let ac = c - a;
        let normal = ab.cross(&ac);

        // Scale-aware test: |ab x ac| = |ab| |ac| sin(theta)
        let scale = ab.norm() * ac.norm();
        if scale == 0.0 || normal.norm() <= COLLINEAR_EPS * scale {
            return Err(Error::DegeneratePlane);
        }

        let center = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        Ok(Self { center, normal })
    }

    /// Offset of the plane along its normal, `dot(center, normal)`
    pub fn offset(&self) -> f64 {
        self.center.coords.dot(&self.normal)
    }

    pub fn side(&self, point: &Point3<f64>) -> PlaneSide {
        side_of(point, &self.normal, self.offset())
    }

    /// Split `points` into the front and back index sets.
    pub fn partition(&self, points: &[Point3<f64>]) -> PlanePartition {
        let offset = self.offset();
        let mut partition = PlanePartition::default();

        for (i, point) in points.iter().enumerate() {
            match side_of(point, &self.normal, offset) {
                PlaneSide::Front => partition.front.push(i),
                PlaneSide::Back => partition.back.push(i),
            }
        }

        partition
    }
}

fn side_of(point: &Point3<f64>, normal: &Vector3<f64>, offset: f64) -> PlaneSide {
    if point.coords.dot(normal) >= offset {
        PlaneSide::Front
    } else {
        PlaneSide::Back
    }
}

/// Estimate the cutting plane through three landmark points.
pub fn estimate_plane(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Result<Plane> {
    Plane::through_points(a, b, c)
}

/// Classify every point against `plane`; ties go to the front side.
pub fn classify_by_plane(points: &[Point3<f64>], plane: &Plane) -> PlanePartition {
    plane.partition(points)
}
