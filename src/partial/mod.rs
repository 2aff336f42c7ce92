// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Partial-shape drivers
//!
//! Two strategies turn a complete mesh into a plausible partial scan:
//! a plane cut through three body landmarks, producing two complementary
//! slices, and hole shooting, which drops several localized patches.

mod cut;
mod shoot;

pub use cut::{plausible_landmarks, CutReport, PlaneCut};
pub use shoot::{HoleShot, ShootReport};

use crate::config::GeneratorConfig;
use crate::geometry::SubsetEngine;
use crate::texture::UvRenderer;
use rand::Rng;
use serde::Serialize;
use slog::{o, Logger};

/// Runs the cut and shoot strategies with one random source
pub struct PartialShapeGenerator<'r, R: Rng> {
    log: Logger,
    rng: R,
    engine: SubsetEngine<'r>,
    config: GeneratorConfig,
}

impl<'r, R: Rng> PartialShapeGenerator<'r, R> {
    pub fn new(log: &Logger, rng: R, renderer: &'r dyn UvRenderer, config: GeneratorConfig) -> Self {
        let log = log.new(o!("module" => "partial"));
        let engine = SubsetEngine::new(&log, renderer).with_texture_repair(config.repair_texture);
        Self {
            log,
            rng,
            engine,
            config,
        }
    }
}

/// Vertex and face counts of one generated mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshSummary {
    pub vertices: usize,
    pub faces: usize,
    pub texcoords: usize,
    pub textured: bool,
}

impl From<&crate::geometry::Mesh> for MeshSummary {
    fn from(mesh: &crate::geometry::Mesh) -> Self {
        Self {
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            texcoords: mesh.texcoord_count(),
            textured: mesh.texture.is_some(),
        }
    }
}
