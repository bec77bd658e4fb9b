//! Per-game vote allocation (3/2/1 scheme; deterministic; no RNG).
//!
//! Contract:
//! - Records are grouped by `game_id` (ordered map of game → row indices).
//! - Each group is stable-sorted by score, descending. Equal scores keep input
//!   row order; no secondary key is applied. Row order is not semantically
//!   meaningful upstream, so exact ties are a documented non-guarantee.
//! - The i-th ranked record gets `AWARDS[i]` for `i < min(3, n)`, everyone
//!   else gets 0. Groups of 1 or 2 simply receive the leading awards.
//!
//! Groups are independent. With the `parallel` feature they are processed on
//! the rayon pool and scattered back by index, so output is identical.

use core::fmt;

use bv_core::{determinism::{cmp_score_desc, group_indices_by}, GameId, GameRecord};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Award sequence, best first.
pub const AWARDS: [u8; 3] = [3, 2, 1];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// `scores` must be parallel to `records`.
    LengthMismatch { records: usize, scores: usize },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::LengthMismatch { records, scores } => {
                write!(f, "score vector length {scores} does not match {records} records")
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Votes per record (parallel to the input) plus the number of games seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteAllocation {
    pub votes: Vec<u8>,
    pub games: usize,
}

/// Rank one game's rows and return `(row index, votes)` in ranked order.
///
/// `indices` index into `scores` and must be in input order.
pub fn allocate_group(indices: &[usize], scores: &[f64]) -> Vec<(usize, u8)> {
    let mut ranked: Vec<usize> = indices.to_vec();
    // `sort_by` is stable: ties stay in input order.
    ranked.sort_by(|&a, &b| cmp_score_desc(scores[a], scores[b]));
    ranked
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| (idx, AWARDS.get(pos).copied().unwrap_or(0)))
        .collect()
}

/// Allocate votes for every game in `records`.
pub fn allocate_votes(records: &[GameRecord], scores: &[f64]) -> Result<VoteAllocation, AllocError> {
    if records.len() != scores.len() {
        return Err(AllocError::LengthMismatch { records: records.len(), scores: scores.len() });
    }

    let groups = group_indices_by(records, |r| r.game_id.clone());
    let games = groups.len();

    let mut votes = vec![0u8; records.len()];
    for (idx, v) in allocate_groups(&groups, scores) {
        votes[idx] = v;
    }

    Ok(VoteAllocation { votes, games })
}

#[cfg(not(feature = "parallel"))]
fn allocate_groups(
    groups: &std::collections::BTreeMap<GameId, Vec<usize>>,
    scores: &[f64],
) -> Vec<(usize, u8)> {
    groups
        .values()
        .flat_map(|idxs| allocate_group(idxs, scores))
        .collect()
}

#[cfg(feature = "parallel")]
fn allocate_groups(
    groups: &std::collections::BTreeMap<GameId, Vec<usize>>,
    scores: &[f64],
) -> Vec<(usize, u8)> {
    let groups: Vec<&Vec<usize>> = groups.values().collect();
    groups
        .par_iter()
        .flat_map_iter(|idxs| allocate_group(idxs, scores))
        .collect()
}
