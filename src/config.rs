//! Analysis configuration file support.
//!
//! This module provides utilities for reading analysis thresholds from
//! TOML configuration files. Every field has a default, so an empty file
//! (or no file at all) yields the standard thresholds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AnalysisError;

/// Analysis configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Spatial artifact detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSettings {
    /// Minimum normalized effect size (in standard-deviation units) for a
    /// grouping to be reported.
    #[serde(default = "default_effect_threshold")]
    pub effect_threshold: f64,
    /// Minimum valid wells before any detection runs.
    #[serde(default = "default_min_wells")]
    pub min_wells: usize,
    /// Minimum valid wells in a row or column group.
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,
}

/// Data-quality validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Robust-score magnitude beyond which a value counts as an extreme
    /// outlier.
    #[serde(default = "default_outlier_robust_z")]
    pub outlier_robust_z: f64,
    /// Overall viability rate below which a warning is emitted.
    #[serde(default = "default_min_viability_rate")]
    pub min_viability_rate: f64,
}

fn default_effect_threshold() -> f64 {
    0.15
}

fn default_min_wells() -> usize {
    20
}

fn default_min_group_size() -> usize {
    3
}

fn default_outlier_robust_z() -> f64 {
    10.0
}

fn default_min_viability_rate() -> f64 {
    0.70
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        ArtifactSettings {
            effect_threshold: default_effect_threshold(),
            min_wells: default_min_wells(),
            min_group_size: default_min_group_size(),
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        ValidationSettings {
            outlier_robust_z: default_outlier_robust_z(),
            min_viability_rate: default_min_viability_rate(),
        }
    }
}

impl AnalysisConfig {
    /// Parse analysis configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        toml::from_str(content)
            .map_err(|e| AnalysisError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load analysis configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.artifacts.effect_threshold, 0.15);
        assert_eq!(config.artifacts.min_wells, 20);
        assert_eq!(config.artifacts.min_group_size, 3);
        assert_eq!(config.validation.outlier_robust_z, 10.0);
        assert_eq!(config.validation.min_viability_rate, 0.70);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config.artifacts.effect_threshold, 0.15);
        assert_eq!(config.validation.min_viability_rate, 0.70);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[artifacts]
effect_threshold = 0.3

[validation]
min_viability_rate = 0.5
"#;

        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.artifacts.effect_threshold, 0.3);
        assert_eq!(config.artifacts.min_wells, 20);
        assert_eq!(config.validation.min_viability_rate, 0.5);
        assert_eq!(config.validation.outlier_robust_z, 10.0);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = AnalysisConfig::from_toml_str("artifacts = 5");
        assert!(result.is_err());
    }
}
