// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Hole-shooting strategy

use super::{MeshSummary, PartialShapeGenerator};
use crate::error::Result;
use crate::geometry::Mesh;
use crate::sampling::shoot_holes;
use rand::Rng;
use serde::Serialize;
use slog::info;

/// A mesh with holes shot into it
#[derive(Debug, Clone)]
pub struct HoleShot {
    /// Ascending indices of the removed vertices, in the input vertex space
    pub removed: Vec<usize>,
    pub mesh: Mesh,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShootReport {
    pub removed: usize,
    pub mesh: MeshSummary,
}

impl HoleShot {
    pub fn report(&self) -> ShootReport {
        ShootReport {
            removed: self.removed.len(),
            mesh: (&self.mesh).into(),
        }
    }
}

impl<'r, R: Rng> PartialShapeGenerator<'r, R> {
    /// Remove random vertex neighborhoods from `mesh`.
    pub fn shoot(&mut self, mesh: &Mesh) -> Result<HoleShot> {
        let params = self.config.hole_params();
        let removed = shoot_holes(&mesh.vertices, &params, None, None, &mut self.rng)?;
        info!(self.log, "shot holes";
            "holes" => params.holes.to_string(),
            "dropout" => params.dropout.to_string(),
            "removed" => removed.len(),
            "of" => mesh.vertex_count());

        let result = self.engine.remove_points(mesh, &removed)?;
        Ok(HoleShot {
            removed,
            mesh: result,
        })
    }
}
