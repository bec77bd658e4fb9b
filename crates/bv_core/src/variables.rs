//! Weight configuration for one pipeline run.
//!
//! Notes:
//! - Keys are statistic names exactly as they appear on `GameRecord::statistics`.
//! - `win_multiplier` is kept apart from the weight map; it is never a statistic.
//! - Bounds shown to users (slider ranges) are advisory and live with the
//!   configuration provider, not here. The core only requires finite values.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightConfig {
    pub weights: BTreeMap<String, f64>,
    pub win_multiplier: f64,
}

impl WeightConfig {
    /// Construct and validate in one step.
    pub fn new(weights: BTreeMap<String, f64>, win_multiplier: f64) -> Result<Self, CoreError> {
        let cfg = WeightConfig { weights, win_multiplier };
        validate_domains(&cfg)?;
        Ok(cfg)
    }

    pub fn weight(&self, statistic: &str) -> Option<f64> {
        self.weights.get(statistic).copied()
    }

    /// Multiplier applied to a record's raw score given its outcome.
    #[inline]
    pub fn outcome_multiplier(&self, win: bool) -> f64 {
        if win { self.win_multiplier } else { 1.0 }
    }
}

/// Domain checks: every weight and the multiplier must be finite, and
/// statistic names must be non-empty.
pub fn validate_domains(cfg: &WeightConfig) -> Result<(), CoreError> {
    if !cfg.win_multiplier.is_finite() {
        return Err(CoreError::DomainOutOfRange("win_multiplier"));
    }
    for (name, w) in &cfg.weights {
        if name.trim().is_empty() {
            return Err(CoreError::DomainOutOfRange("statistic name"));
        }
        if !w.is_finite() {
            return Err(CoreError::DomainOutOfRange("weight"));
        }
    }
    Ok(())
}
