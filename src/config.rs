// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Generator configuration system

use crate::sampling::{HoleParams, SampleRange};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "partialscan.toml";

/// Settings shared by the `cut` and `shoot` drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of holes per `shoot` run
    pub holes: SampleRange<usize>,
    /// Fraction of the candidate pool removed around each hole center
    pub dropout: SampleRange<f64>,
    /// Number of leading landmarks that may anchor a cutting plane
    pub landmark_pool: usize,
    /// Explicit landmark names for the cutting plane; overrides `landmark_pool`
    pub landmark_names: Vec<String>,
    /// Re-render the texture atlas after removing points
    pub repair_texture: bool,
    /// Random seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let holes = HoleParams::default();
        Self {
            holes: holes.holes,
            dropout: holes.dropout,
            landmark_pool: 26,
            landmark_names: Vec::new(),
            repair_texture: true,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: GeneratorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `partialscan.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PARTIALSCAN_*` overrides read through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(seed) = lookup("PARTIALSCAN_SEED") {
            self.seed = Some(seed.trim().parse().context("Invalid PARTIALSCAN_SEED")?);
        }

        if let Some(repair) = lookup("PARTIALSCAN_REPAIR_TEXTURE") {
            self.repair_texture = repair
                .trim()
                .parse()
                .context("Invalid PARTIALSCAN_REPAIR_TEXTURE")?;
        }

        if let Some(pool) = lookup("PARTIALSCAN_LANDMARK_POOL") {
            self.landmark_pool = pool
                .trim()
                .parse()
                .context("Invalid PARTIALSCAN_LANDMARK_POOL")?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn hole_params(&self) -> HoleParams {
        HoleParams {
            holes: self.holes,
            dropout: self.dropout,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.hole_params().validate()?;
        if self.landmark_names.is_empty() && self.landmark_pool < 3 {
            anyhow::bail!("landmark_pool must allow at least 3 landmarks");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.holes, SampleRange::Uniform(3, 10));
        assert_eq!(config.dropout, SampleRange::Uniform(0.01, 0.05));
        assert_eq!(config.landmark_pool, 26);
        assert!(config.repair_texture);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GeneratorConfig = toml::from_str("holes = 4\nseed = 9\n").unwrap();
        assert_eq!(config.holes, SampleRange::Fixed(4));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.dropout, SampleRange::Uniform(0.01, 0.05));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PARTIALSCAN_SEED", "17"),
            ("PARTIALSCAN_REPAIR_TEXTURE", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = GeneratorConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.seed, Some(17));
        assert!(!config.repair_texture);
        assert_eq!(config.landmark_pool, 26);

        let result = config.apply_overrides(|key| {
            (key == "PARTIALSCAN_LANDMARK_POOL").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            dropout: SampleRange::Fixed(2.0),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
