// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Plane-cut strategy

use super::{MeshSummary, PartialShapeGenerator};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::geometry::{classify_by_plane, estimate_plane, Mesh, Plane};
use crate::io::Landmarks;
use nalgebra::Point3;
use rand::Rng;
use serde::Serialize;
use slog::{debug, info};

/// Two complementary slices of a mesh split by a plane
#[derive(Debug, Clone)]
pub struct PlaneCut {
    pub plane: Plane,
    /// Names of the three landmarks the plane passes through
    pub landmarks: [String; 3],
    /// The mesh without its front side
    pub first: Mesh,
    /// The mesh without its back side
    pub second: Mesh,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutReport {
    pub plane: Plane,
    pub landmarks: [String; 3],
    pub first: MeshSummary,
    pub second: MeshSummary,
}

impl PlaneCut {
    pub fn report(&self) -> CutReport {
        CutReport {
            plane: self.plane,
            landmarks: self.landmarks.clone(),
            first: (&self.first).into(),
            second: (&self.second).into(),
        }
    }
}

/// Landmarks a cutting plane may pass through, in file order.
///
/// With configured names every name must exist; otherwise the first
/// `landmark_pool` landmarks are used.
pub fn plausible_landmarks<'a>(
    landmarks: &'a Landmarks,
    config: &GeneratorConfig,
) -> Result<Vec<(&'a str, &'a Point3<f64>)>> {
    if config.landmark_names.is_empty() {
        return Ok(landmarks.iter().take(config.landmark_pool).collect());
    }

    config
        .landmark_names
        .iter()
        .map(|name| {
            landmarks
                .entry(name)
                .ok_or_else(|| Error::MissingLandmarks(format!("no landmark named '{}'", name)))
        })
        .collect()
}

impl<'r, R: Rng> PartialShapeGenerator<'r, R> {
    /// Split `mesh` by a plane through three random plausible landmarks.
    pub fn cut(&mut self, mesh: &Mesh, landmarks: Option<&Landmarks>) -> Result<PlaneCut> {
        let landmarks = landmarks
            .ok_or_else(|| Error::MissingLandmarks("no landmark collection given".to_string()))?;

        let pool = plausible_landmarks(landmarks, &self.config)?;
        if pool.len() < 3 {
            return Err(Error::MissingLandmarks(format!(
                "a cutting plane needs 3 landmarks, {} available",
                pool.len()
            )));
        }

        let picked = rand::seq::index::sample(&mut self.rng, pool.len(), 3).into_vec();
        let [a, b, c] = [pool[picked[0]], pool[picked[1]], pool[picked[2]]];
        debug!(self.log, "cut landmarks"; "a" => a.0, "b" => b.0, "c" => c.0);

        let plane = estimate_plane(a.1, b.1, c.1)?;
        let partition = classify_by_plane(&mesh.vertices, &plane);
        info!(self.log, "cutting plane";
            "center" => format!("{:?}", plane.center.coords.as_slice()),
            "normal" => format!("{:?}", plane.normal.as_slice()),
            "front" => partition.front.len(),
            "back" => partition.back.len());

        let first = self.engine.remove_points(mesh, &partition.front)?;
        let second = self.engine.remove_points(mesh, &partition.back)?;

        Ok(PlaneCut {
            plane,
            landmarks: [a.0.to_string(), b.0.to_string(), c.0.to_string()],
            first,
            second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks() -> Landmarks {
        Landmarks::parse("nose 0 0 1\nchin 0 -1 1\near_left -1 0 0\near_right 1 0 0\n").unwrap()
    }

    #[test]
    fn test_pool_takes_leading_landmarks() {
        let config = GeneratorConfig {
            landmark_pool: 3,
            ..GeneratorConfig::default()
        };
        let all = landmarks();
        let pool = plausible_landmarks(&all, &config).unwrap();
        let names: Vec<&str> = pool.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["nose", "chin", "ear_left"]);
    }

    #[test]
    fn test_pool_from_names() {
        let config = GeneratorConfig {
            landmark_names: vec!["ear_right".to_string(), "nose".to_string()],
            ..GeneratorConfig::default()
        };
        let all = landmarks();
        let pool = plausible_landmarks(&all, &config).unwrap();
        assert_eq!(pool[0].0, "ear_right");
        assert_eq!(pool[1].1, &Point3::new(0.0, 0.0, 1.0));

        let config = GeneratorConfig {
            landmark_names: vec!["tail".to_string()],
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            plausible_landmarks(&all, &config),
            Err(Error::MissingLandmarks(_))
        ));
    }
}
