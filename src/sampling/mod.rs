// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Random vertex selection: spatial index and hole sampler

mod holes;
mod spatial;

pub use holes::{shoot_holes, HoleParams, SampleRange};
pub use spatial::SpatialIndex;
