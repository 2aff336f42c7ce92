// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Spatial hole sampler
//!
//! Picks a random number of hole centers and grows each one into the set of
//! its nearest vertices, simulating localized scanner dropout.

use super::SpatialIndex;
use crate::error::{Error, Result};
use crate::geometry::Face;
use nalgebra::Point3;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A value that is either fixed or drawn uniformly from `[low, high)`.
///
/// Serialized as a bare value or as a two-element array; parsed from `"5"`
/// or `"3:10"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleRange<T> {
    Fixed(T),
    Uniform(T, T),
}

impl<T> SampleRange<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        match *self {
            Self::Fixed(value) => value,
            Self::Uniform(low, high) => rng.gen_range(low..high),
        }
    }

    /// Lower and upper ends; equal for a fixed value
    pub fn bounds(&self) -> (T, T) {
        match *self {
            Self::Fixed(value) => (value, value),
            Self::Uniform(low, high) => (low, high),
        }
    }
}

impl<T: FromStr> FromStr for SampleRange<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<T>()
                .map_err(|_| Error::InvalidArgument(format!("cannot parse '{}' in range '{}'", part, s)))
        };

        match s.split_once(':') {
            Some((low, high)) => Ok(Self::Uniform(parse(low)?, parse(high)?)),
            None => Ok(Self::Fixed(parse(s)?)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for SampleRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => write!(f, "{}", value),
            Self::Uniform(low, high) => write!(f, "{}:{}", low, high),
        }
    }
}

/// Hole count and per-hole dropout proportion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleParams {
    pub holes: SampleRange<usize>,
    pub dropout: SampleRange<f64>,
}

impl Default for HoleParams {
    fn default() -> Self {
        Self {
            holes: SampleRange::Uniform(3, 10),
            dropout: SampleRange::Uniform(0.01, 0.05),
        }
    }
}

impl HoleParams {
    pub fn validate(&self) -> Result<()> {
        if let SampleRange::Uniform(low, high) = self.holes {
            if low >= high {
                return Err(Error::InvalidArgument(format!(
                    "hole count range {}:{} is empty",
                    low, high
                )));
            }
        }

        let (low, high) = self.dropout.bounds();
        if let SampleRange::Uniform(..) = self.dropout {
            if low >= high {
                return Err(Error::InvalidArgument(format!(
                    "dropout range {}:{} is empty",
                    low, high
                )));
            }
        }
        if !(low > 0.0 && high <= 1.0) {
            return Err(Error::InvalidArgument(format!(
                "dropout {} must lie in (0, 1]",
                self.dropout
            )));
        }

        Ok(())
    }
}

/// Select the vertices to delete for a random set of holes.
///
/// Hole centers come from every vertex, or, with `mask`, from the vertices of
/// the faces flagged true. Neighborhoods are always searched over the full
/// point set. The result is sorted and free of duplicates.
pub fn shoot_holes<R: Rng + ?Sized>(
    vertices: &[Point3<f64>],
    params: &HoleParams,
    mask: Option<&[bool]>,
    faces: Option<&[Face]>,
    rng: &mut R,
) -> Result<Vec<usize>> {
    params.validate()?;

    let pool = candidate_pool(vertices.len(), mask, faces)?;
    let index = SpatialIndex::build(vertices);

    let hole_count = params.holes.sample(rng);
    if hole_count == 0 {
        return Ok(Vec::new());
    }
    if pool.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{} holes requested but no vertex can host a hole",
            hole_count
        )));
    }

    let centers: Vec<usize> = (0..hole_count)
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect();

    let mut removed = BTreeSet::new();
    for center in centers {
        let proportion = params.dropout.sample(rng);
        let size = (pool.len() as f64 * proportion).round() as usize;
        removed.extend(index.nearest(&vertices[center], size));
    }

    Ok(removed.into_iter().collect())
}

fn candidate_pool(
    vertex_count: usize,
    mask: Option<&[bool]>,
    faces: Option<&[Face]>,
) -> Result<Vec<usize>> {
    let mask = match mask {
        Some(mask) => mask,
        None => return Ok((0..vertex_count).collect()),
    };
    let faces = faces.ok_or_else(|| {
        Error::InvalidArgument("a face mask needs the faces it applies to".to_string())
    })?;
    if mask.len() != faces.len() {
        return Err(Error::InvalidArgument(format!(
            "face mask has {} entries for {} faces",
            mask.len(),
            faces.len()
        )));
    }

    let mut pool = BTreeSet::new();
    for (face, _) in faces.iter().zip(mask).filter(|(_, &selected)| selected) {
        for &v in face {
            if v >= vertex_count {
                return Err(Error::IndexOutOfRange {
                    index: v,
                    len: vertex_count,
                });
            }
            pool.insert(v);
        }
    }

    Ok(pool.into_iter().collect())
}
