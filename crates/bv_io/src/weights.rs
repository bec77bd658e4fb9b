//! Weight configuration provider.
//!
//! Produces one validated `WeightConfig` per run from, in order of precedence:
//! 1. command-line overrides (`name=value`, explicit win multiplier),
//! 2. an optional JSON file `{ "weights": {..}, "win_multiplier": x }`,
//! 3. the named default table below.
//!
//! The slider bounds in `DEFAULT_WEIGHTS` are advisory. Values outside them
//! are reported by `out_of_range` and never rejected here.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bv_core::WeightConfig;
use serde::{Deserialize, Serialize};

use crate::IoError;

/// One statistic's default coefficient and its advisory bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightDefault {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

const fn wd(name: &'static str, min: f64, max: f64, default: f64) -> WeightDefault {
    WeightDefault { name, min, max, default }
}

pub const DEFAULT_WEIGHTS: [WeightDefault; 14] = [
    wd("points", 0.0, 5.0, 1.0),
    wd("assists", 0.0, 5.0, 2.0),
    wd("blocks", 0.0, 5.0, 3.0),
    wd("steals", 0.0, 5.0, 2.0),
    wd("fieldGoalsAttempted", -2.0, 0.0, -0.7),
    wd("fieldGoalsMade", 0.0, 4.0, 2.0),
    wd("threePointersMade", 0.0, 3.0, 0.75),
    wd("freeThrowsAttempted", -2.0, 0.0, -0.3),
    wd("freeThrowsMade", 0.0, 2.0, 0.75),
    wd("reboundsDefensive", 0.0, 3.0, 1.0),
    wd("reboundsOffensive", 0.0, 5.0, 1.25),
    wd("turnovers", -5.0, 0.0, -1.0),
    wd("foulsPersonal", -5.0, 0.0, 0.0),
    wd("plusMinusPoints", 0.0, 1.0, 0.3),
];

pub const DEFAULT_WIN_MULTIPLIER: WeightDefault = wd("win_multiplier", 0.0, 3.0, 1.25);

/// The default configuration (every slider at its starting position).
pub fn default_config() -> WeightConfig {
    WeightConfig {
        weights: default_weight_map(),
        win_multiplier: DEFAULT_WIN_MULTIPLIER.default,
    }
}

fn default_weight_map() -> BTreeMap<String, f64> {
    DEFAULT_WEIGHTS.iter().map(|d| (d.name.to_string(), d.default)).collect()
}

pub fn lookup_default(name: &str) -> Option<&'static WeightDefault> {
    DEFAULT_WEIGHTS.iter().find(|d| d.name == name)
}

/* ------------------------------- File form ------------------------------- */

/// On-disk weight file. Both members are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_multiplier: Option<f64>,
}

impl WeightsFile {
    /// Resolve against the defaults. A present `weights` object replaces the
    /// default table entirely.
    pub fn resolve(self) -> Result<WeightConfig, IoError> {
        let weights = self.weights.unwrap_or_else(default_weight_map);
        let win_multiplier = self.win_multiplier.unwrap_or(DEFAULT_WIN_MULTIPLIER.default);
        Ok(WeightConfig::new(weights, win_multiplier)?)
    }
}

/// Parse a weight file from a JSON string.
pub fn weights_from_json_str(s: &str) -> Result<WeightConfig, IoError> {
    let file: WeightsFile = serde_json::from_str(s)?;
    file.resolve()
}

/// Load a weight file from disk. Returns the config and the SHA-256 of the raw
/// bytes.
pub fn load_weights(path: &Path) -> Result<(WeightConfig, String), IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| IoError::Config(format!("{}: not UTF-8: {e}", path.display())))?;
    let cfg = weights_from_json_str(text)?;
    Ok((cfg, crate::hasher::sha256_hex(&bytes)))
}

/* ------------------------------- Overrides ------------------------------- */

/// Parse one `name=value` override.
pub fn parse_override(s: &str) -> Result<(String, f64), IoError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| IoError::Config(format!("expected name=value, got '{s}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(IoError::Config(format!("empty statistic name in '{s}'")));
    }
    let v: f64 = value
        .trim()
        .parse()
        .map_err(|_| IoError::Config(format!("'{}' is not a number (in '{s}')", value.trim())))?;
    if !v.is_finite() {
        return Err(IoError::Config(format!("weight for '{name}' must be finite")));
    }
    Ok((name.to_string(), v))
}

/// Apply overrides on top of `base`; later entries win. The result is
/// re-validated.
pub fn apply_overrides(
    base: WeightConfig,
    weights: &[(String, f64)],
    win_multiplier: Option<f64>,
) -> Result<WeightConfig, IoError> {
    let mut map = base.weights;
    for (name, v) in weights {
        map.insert(name.clone(), *v);
    }
    let mult = win_multiplier.unwrap_or(base.win_multiplier);
    Ok(WeightConfig::new(map, mult)?)
}

/* ---------------------------- Advisory bounds ---------------------------- */

/// A configured value outside its default slider bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeWarning {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} is outside the usual range [{}, {}]",
            self.name, self.value, self.min, self.max
        )
    }
}

/// Values outside the default bounds. Statistics without a default entry
/// have no bounds and are never reported.
pub fn out_of_range(cfg: &WeightConfig) -> Vec<RangeWarning> {
    let check = |d: &WeightDefault, value: f64| {
        (value < d.min || value > d.max).then(|| RangeWarning {
            name: d.name.to_string(),
            value,
            min: d.min,
            max: d.max,
        })
    };
    let mut out: Vec<RangeWarning> = cfg
        .weights
        .iter()
        .filter_map(|(name, v)| lookup_default(name).and_then(|d| check(d, *v)))
        .collect();
    out.extend(check(&DEFAULT_WIN_MULTIPLIER, cfg.win_multiplier));
    out
}
