//! Source rows and leaderboard rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerName, Season};

/// One player-game row as delivered by the data source (already filtered to
/// regular-season games). Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameRecord {
    /// 0-based position in the filtered input; witness for stable vote ties.
    pub row_index: usize,
    pub game_id: GameId,
    pub player_name: PlayerName,
    pub date: NaiveDate,
    pub win: bool,
    /// Statistic name → value. Absent keys are absent values, never zero.
    pub statistics: BTreeMap<String, f64>,
}

impl GameRecord {
    #[inline]
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.statistics.get(name).copied()
    }
}

/// One leaderboard row. `rank` is 1-based and unique within `season`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeasonLeaderboardEntry {
    pub season: Season,
    pub player_name: PlayerName,
    pub season_total_votes: u32,
    pub rank: u32,
}
