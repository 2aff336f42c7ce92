// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Geometry module - mesh representation, cutting planes and subsetting

mod compact;
mod mesh;
mod plane;
mod primitives;
mod subset;

pub use compact::IndexCompaction;
pub use mesh::{fan_triangles, Face, Mesh};
pub use plane::{classify_by_plane, estimate_plane, Plane, PlanePartition, PlaneSide};
pub use primitives::{checker_texture, Primitive};
pub use subset::{remove_points, repair_texture, subset_geometry, SubsetEngine};
