//! crates/bv_pipeline/src/tabulate.rs
//! TABULATE stage: attach a season label and a weighted score to every record.
//!
//! Output vectors are parallel to the input slice (same length, same order).
//! The first record missing a weighted statistic aborts the stage.

use bv_algo::{classify_season, score_all, ScoreError};
use bv_core::{GameRecord, Season, WeightConfig};
use tracing::debug;

/// Derived per-record columns produced by this stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tabulated {
    pub seasons: Vec<Season>,
    pub scores: Vec<f64>,
}

impl Tabulated {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

pub fn tabulate(records: &[GameRecord], cfg: &WeightConfig) -> Result<Tabulated, ScoreError> {
    let seasons: Vec<Season> = records.iter().map(|r| classify_season(r.date)).collect();
    let scores = score_all(records, cfg)?;
    debug!(records = records.len(), statistics = cfg.weights.len(), "tabulate: scored");
    Ok(Tabulated { seasons, scores })
}
