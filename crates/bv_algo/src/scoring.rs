//! Weighted linear scoring (deterministic).
//!
//! Inputs:
//! - a `GameRecord` (its `statistics` map and `win` flag)
//! - a `WeightConfig` (statistic → weight, plus `win_multiplier`)
//!
//! Output:
//! - `score = Σ statistics[name] * weight[name]`, times `win_multiplier` on a win.
//!
//! Rules in this layer:
//! - Every weighted statistic must exist on the record; absence is an error,
//!   never an implicit zero.
//! - Summation follows the weight map's key order, so the result is
//!   bit-for-bit reproducible.

use core::fmt;

use bv_core::{GameRecord, WeightConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreError {
    /// A statistic named in the weight config is absent from the record.
    MissingStatistic { statistic: String, row: usize },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::MissingStatistic { statistic, row } => {
                write!(f, "missing statistic '{statistic}' on row {row}")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Weighted sum before the outcome multiplier.
pub fn raw_score(record: &GameRecord, cfg: &WeightConfig) -> Result<f64, ScoreError> {
    let mut acc = 0.0_f64;
    for (name, w) in &cfg.weights {
        let v = record.stat(name).ok_or_else(|| ScoreError::MissingStatistic {
            statistic: name.clone(),
            row: record.row_index,
        })?;
        acc += v * w;
    }
    Ok(acc)
}

/// Final per-record score.
pub fn score_record(record: &GameRecord, cfg: &WeightConfig) -> Result<f64, ScoreError> {
    Ok(raw_score(record, cfg)? * cfg.outcome_multiplier(record.win))
}

/// Score every record; the first failure aborts (no partial output).
pub fn score_all(records: &[GameRecord], cfg: &WeightConfig) -> Result<Vec<f64>, ScoreError> {
    records.iter().map(|r| score_record(r, cfg)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record(row: usize, win: bool, stats: &[(&str, f64)]) -> GameRecord {
        GameRecord {
            row_index: row,
            game_id: "G1".parse().unwrap(),
            player_name: "A B".parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            win,
            statistics: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn cfg(pairs: &[(&str, f64)], mult: f64) -> WeightConfig {
        let w: BTreeMap<String, f64> = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        WeightConfig::new(w, mult).unwrap()
    }

    #[test]
    fn loss_applies_no_adjustment() {
        let r = record(0, false, &[("points", 20.0), ("assists", 5.0), ("turnovers", 3.0)]);
        let c = cfg(&[("points", 1.0), ("assists", 2.0), ("turnovers", -1.0)], 1.25);
        assert_eq!(score_record(&r, &c).unwrap(), 27.0);
    }

    #[test]
    fn win_scales_raw_score() {
        let r = record(0, true, &[("points", 20.0), ("assists", 5.0), ("turnovers", 3.0)]);
        let c = cfg(&[("points", 1.0), ("assists", 2.0), ("turnovers", -1.0)], 1.25);
        assert_eq!(raw_score(&r, &c).unwrap(), 27.0);
        assert_eq!(score_record(&r, &c).unwrap(), 33.75);
    }

    #[test]
    fn unweighted_statistics_are_ignored() {
        let r = record(0, false, &[("points", 10.0), ("minutes", 36.0)]);
        let c = cfg(&[("points", 1.0)], 1.0);
        assert_eq!(score_record(&r, &c).unwrap(), 10.0);
    }

    #[test]
    fn missing_statistic_is_an_error_not_zero() {
        let r = record(7, false, &[("points", 10.0)]);
        let c = cfg(&[("points", 1.0), ("blocks", 3.0)], 1.0);
        assert_eq!(
            score_record(&r, &c),
            Err(ScoreError::MissingStatistic { statistic: "blocks".into(), row: 7 })
        );
    }

    #[test]
    fn score_all_aborts_on_first_failure() {
        let ok = record(0, false, &[("points", 1.0)]);
        let bad = record(1, false, &[]);
        let c = cfg(&[("points", 1.0)], 1.0);
        assert!(score_all(&[ok.clone(), bad], &c).is_err());
        assert_eq!(score_all(&[ok], &c).unwrap(), vec![1.0]);
    }

    proptest! {
        // Raising one weight never lowers a score whose statistic is positive,
        // and never changes a score whose statistic is zero.
        #[test]
        fn single_weight_change_is_monotone(
            pts in 0.0f64..60.0,
            ast in prop_oneof![Just(0.0f64), 0.5f64..20.0],
            w_ast in -5.0f64..5.0,
            delta in 0.01f64..3.0,
            win in any::<bool>(),
            mult in 0.0f64..3.0,
        ) {
            let r = record(0, win, &[("points", pts), ("assists", ast)]);
            let lo = cfg(&[("points", 1.0), ("assists", w_ast)], mult);
            let hi = cfg(&[("points", 1.0), ("assists", w_ast + delta)], mult);
            let s_lo = score_record(&r, &lo).unwrap();
            let s_hi = score_record(&r, &hi).unwrap();
            if ast == 0.0 {
                prop_assert_eq!(s_lo, s_hi);
            } else {
                prop_assert!(s_hi >= s_lo);
                if !win || mult > 0.0 {
                    prop_assert!(s_hi > s_lo);
                }
            }
        }

        #[test]
        fn scoring_is_reproducible(pts in -50.0f64..50.0, reb in -50.0f64..50.0, win in any::<bool>()) {
            let r = record(0, win, &[("points", pts), ("reboundsDefensive", reb)]);
            let c = cfg(&[("points", 1.0), ("reboundsDefensive", 1.0)], 1.25);
            prop_assert_eq!(
                score_record(&r, &c).unwrap().to_bits(),
                score_record(&r, &c).unwrap().to_bits()
            );
        }
    }
}
