// crates/bv_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure algorithms of the season vote engine. No I/O, no clocks, no RNG.
//!
//! Stage order used by the pipeline:
//! `season` → `scoring` → `votes` → `ranking`.

pub mod ranking;
pub mod scoring;
pub mod season;
pub mod votes;

// Convenience re-exports (pipeline imports these from crate root)
pub use ranking::{season_totals, top_k_per_season, SeasonTotals, LEADERBOARD_SIZE};
pub use scoring::{raw_score, score_all, score_record, ScoreError};
pub use season::{classify_season, SEASON_START_MONTH};
pub use votes::{allocate_group, allocate_votes, AllocError, VoteAllocation, AWARDS};
