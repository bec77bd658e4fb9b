//! crates/bv_pipeline/src/annotate.rs
//! The annotated record table: every input record with its derived columns,
//! in input order. Field order is the CSV column order.

use bv_algo::VoteAllocation;
use bv_core::{GameId, GameRecord, PlayerName, Season};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregated;
use crate::tabulate::Tabulated;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    pub game_id: GameId,
    pub game_date: NaiveDate,
    pub season: Season,
    pub player_name: PlayerName,
    pub win: bool,
    pub score: f64,
    pub votes: u8,
    pub season_total_votes: u32,
}

pub fn annotate(
    records: &[GameRecord],
    tab: &Tabulated,
    alloc: &VoteAllocation,
    agg: &Aggregated,
) -> Vec<AnnotatedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| AnnotatedRecord {
            game_id: r.game_id.clone(),
            game_date: r.date,
            season: tab.seasons[i],
            player_name: r.player_name.clone(),
            win: r.win,
            score: tab.scores[i],
            votes: alloc.votes[i],
            season_total_votes: agg.total_for(tab.seasons[i], &r.player_name),
        })
        .collect()
}
