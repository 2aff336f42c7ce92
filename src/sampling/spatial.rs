// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! k-nearest-neighbor index over mesh vertices

use nalgebra::Point3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

struct IndexedPoint(usize, Point3<f64>);

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.1.x, self.1.y, self.1.z])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.1.x - point[0];
        let dy = self.1.y - point[1];
        let dz = self.1.z - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Immutable R*-tree over a point set, answering k-NN queries by index
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn build(points: &[Point3<f64>]) -> Self {
        let wrappers: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPoint(i, *p))
            .collect();

        Self {
            tree: RTree::bulk_load(wrappers),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of the `k` points closest to `query`, nearest first.
    /// Returns every point when `k` exceeds the point count.
    pub fn nearest(&self, query: &Point3<f64>, k: usize) -> Vec<usize> {
        self.tree
            .nearest_neighbor_iter(&[query.x, query.y, query.z])
            .take(k)
            .map(|point| point.0)
            .collect()
    }
}
