//! Engine configuration.
//!
//! Everything a deployment tunes (threshold, calibration policy and its
//! boost constants, parallelism) lives here, serde-first so configs can be
//! embedded in higher-level service configs or loaded from a YAML file.
//!
//! ## Example YAML configuration
//!
//! ```yaml
//! version: 1
//! min_score: 40.0
//! use_parallel: true
//! policy:
//!   type: breakpoint
//!   cross_language_boost: 0.35
//!   high_confidence_multiplier: 1.2
//!   high_confidence_cutoff: 0.8
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibrate::CalibrationPolicy;
use crate::error::MatchError;

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(#[from] MatchError),
}

/// Configuration for the overlap engine.
///
/// Cheap to clone and serde-friendly so it can cross process boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: u32,
    /// Minimum calibrated score (inclusive) a candidate must reach to
    /// appear in the result list.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: f32,
    /// Calibration policy applied to every raw similarity.
    #[serde(default)]
    pub policy: CalibrationPolicy,
    /// Scan the corpus with rayon worker threads instead of a single pass.
    /// Results are identical either way.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_min_score() -> f32 {
        40.0
    }

    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig("version must be >= 1".into()));
        }
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(MatchError::InvalidConfig(
                "min_score must be between 0.0 and 100.0".into(),
            ));
        }
        if let CalibrationPolicy::Breakpoint {
            cross_language_boost,
            high_confidence_multiplier,
            high_confidence_cutoff,
        } = &self.policy
        {
            if *cross_language_boost < 0.0 {
                return Err(MatchError::InvalidConfig(
                    "cross_language_boost must be >= 0.0".into(),
                ));
            }
            if *high_confidence_multiplier < 1.0 {
                return Err(MatchError::InvalidConfig(
                    "high_confidence_multiplier must be >= 1.0".into(),
                ));
            }
            if !(0.0..=1.0).contains(high_confidence_cutoff) {
                return Err(MatchError::InvalidConfig(
                    "high_confidence_cutoff must be between 0.0 and 1.0".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            min_score: Self::default_min_score(),
            policy: CalibrationPolicy::default(),
            use_parallel: false,
        }
    }
}
