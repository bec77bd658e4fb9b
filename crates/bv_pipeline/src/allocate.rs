//! crates/bv_pipeline/src/allocate.rs
//! ALLOCATE stage: per-game 3/2/1 votes over the tabulated scores.
//!
//! Delegates the ranking to `bv_algo::votes`; this stage only checks the
//! shape of its inputs and the award invariant on the way out.

use bv_algo::{allocate_votes, AllocError, VoteAllocation, AWARDS};
use bv_core::{determinism::group_indices_by, GameRecord};
use tracing::debug;

use crate::tabulate::Tabulated;

pub fn allocate(records: &[GameRecord], tab: &Tabulated) -> Result<VoteAllocation, AllocError> {
    let alloc = allocate_votes(records, &tab.scores)?;
    debug_assert!(awards_are_prefixes(records, &alloc.votes));
    debug!(games = alloc.games, "allocate: votes assigned");
    Ok(alloc)
}

/// Each game's votes, sorted descending, are `AWARDS` truncated or padded
/// with zeros to the group size.
pub fn awards_are_prefixes(records: &[GameRecord], votes: &[u8]) -> bool {
    group_indices_by(records, |r| r.game_id.clone()).values().all(|idxs| {
        let mut got: Vec<u8> = idxs.iter().map(|&i| votes[i]).collect();
        got.sort_unstable_by(|a, b| b.cmp(a));
        got.iter()
            .enumerate()
            .all(|(pos, v)| *v == AWARDS.get(pos).copied().unwrap_or(0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_core::Season;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn rec(row: usize, game: &str, name: &str) -> GameRecord {
        GameRecord {
            row_index: row,
            game_id: game.parse().unwrap(),
            player_name: name.parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            win: false,
            statistics: BTreeMap::new(),
        }
    }

    fn tab(scores: &[f64]) -> Tabulated {
        Tabulated {
            seasons: vec![Season::from_ending_year(2024); scores.len()],
            scores: scores.to_vec(),
        }
    }

    #[test]
    fn interleaved_games_are_independent() {
        let records = vec![
            rec(0, "G1", "A"),
            rec(1, "G2", "B"),
            rec(2, "G1", "C"),
            rec(3, "G2", "D"),
            rec(4, "G1", "E"),
            rec(5, "G1", "F"),
        ];
        let alloc = allocate(&records, &tab(&[10.0, 1.0, 7.0, 2.0, 4.0, 0.5])).unwrap();
        assert_eq!(alloc.votes, vec![3, 2, 2, 3, 1, 0]);
        assert_eq!(alloc.games, 2);
        assert!(awards_are_prefixes(&records, &alloc.votes));
    }

    #[test]
    fn rejects_wrong_votes() {
        let records = vec![rec(0, "G1", "A"), rec(1, "G1", "B")];
        assert!(!awards_are_prefixes(&records, &[3, 1]));
        assert!(!awards_are_prefixes(&records, &[3, 3]));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let records = vec![rec(0, "G1", "A")];
        let err = allocate(&records, &tab(&[1.0, 2.0])).unwrap_err();
        assert_eq!(err, AllocError::LengthMismatch { records: 1, scores: 2 });
    }
}
