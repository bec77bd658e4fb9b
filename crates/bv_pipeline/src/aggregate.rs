//! crates/bv_pipeline/src/aggregate.rs
//! AGGREGATE stage: season totals per player and the top-K board per season.

use std::collections::BTreeSet;

use bv_algo::{season_totals, top_k_per_season, SeasonTotals, VoteAllocation};
use bv_core::{GameRecord, PlayerName, Season, SeasonLeaderboardEntry};
use tracing::debug;

use crate::tabulate::Tabulated;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregated {
    /// `(season, player) → total votes`, canonical key order.
    pub totals: SeasonTotals,
    /// Season ↑, rank ↑.
    pub entries: Vec<SeasonLeaderboardEntry>,
}

impl Aggregated {
    pub fn seasons(&self) -> BTreeSet<Season> {
        self.totals.keys().map(|(s, _)| *s).collect()
    }

    pub fn players(&self) -> BTreeSet<&PlayerName> {
        self.totals.keys().map(|(_, p)| p).collect()
    }

    /// Total for one `(season, player)`; zero if the player did not appear.
    pub fn total_for(&self, season: Season, player: &PlayerName) -> u32 {
        self.totals.get(&(season, player.clone())).copied().unwrap_or(0)
    }
}

pub fn aggregate(
    records: &[GameRecord],
    tab: &Tabulated,
    alloc: &VoteAllocation,
    k: usize,
) -> Aggregated {
    let totals = season_totals(records, &tab.seasons, &alloc.votes);
    let entries = top_k_per_season(&totals, k);
    debug!(groups = totals.len(), entries = entries.len(), "aggregate: season boards built");
    Aggregated { totals, entries }
}
