//! Season aggregation and top-K ranking.
//!
//! 1. Sum votes per `(season, player)`; iteration order of the resulting map
//!    is `(season ↑, player name ↑)`.
//! 2. Per season, stable-sort by total votes descending. Because the input is
//!    already in name order, equal totals end up ordered by player name.
//! 3. Keep the first `k` rows and number them `1..=k` ("first" ranking:
//!    ties get consecutive, never shared, ranks).

use std::collections::BTreeMap;

use bv_core::{GameRecord, PlayerName, Season, SeasonLeaderboardEntry};

/// Leaderboard length per season.
pub const LEADERBOARD_SIZE: usize = 5;

/// `(season, player) → season total votes`, in canonical key order.
pub type SeasonTotals = BTreeMap<(Season, PlayerName), u32>;

/// Sum votes per (season, player). Inputs are parallel slices.
///
/// Panics in debug builds if the slices disagree in length.
pub fn season_totals(records: &[GameRecord], seasons: &[Season], votes: &[u8]) -> SeasonTotals {
    debug_assert_eq!(records.len(), seasons.len());
    debug_assert_eq!(records.len(), votes.len());

    let mut totals = SeasonTotals::new();
    for ((r, s), v) in records.iter().zip(seasons).zip(votes) {
        *totals.entry((*s, r.player_name.clone())).or_insert(0) += u32::from(*v);
    }
    totals
}

/// Top `k` players per season, seasons ascending, rank ascending within a season.
pub fn top_k_per_season(totals: &SeasonTotals, k: usize) -> Vec<SeasonLeaderboardEntry> {
    let mut by_season: BTreeMap<Season, Vec<(&PlayerName, u32)>> = BTreeMap::new();
    for ((season, player), total) in totals {
        by_season.entry(*season).or_default().push((player, *total));
    }

    let mut out = Vec::new();
    for (season, mut rows) in by_season {
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        out.extend(rows.into_iter().take(k).enumerate().map(|(i, (player, total))| {
            SeasonLeaderboardEntry {
                season,
                player_name: player.clone(),
                season_total_votes: total,
                rank: i as u32 + 1,
            }
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn rec(row: usize, player: &str) -> GameRecord {
        GameRecord {
            row_index: row,
            game_id: format!("G{row}").parse().unwrap(),
            player_name: player.parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            win: false,
            statistics: Default::default(),
        }
    }

    fn s(y: i32) -> Season {
        Season::from_ending_year(y)
    }

    #[test]
    fn totals_sum_within_season_only() {
        let recs = vec![rec(0, "A A"), rec(1, "A A"), rec(2, "A A")];
        let seasons = vec![s(2024), s(2024), s(2025)];
        let totals = season_totals(&recs, &seasons, &[3, 2, 1]);
        assert_eq!(totals[&(s(2024), "A A".parse().unwrap())], 5);
        assert_eq!(totals[&(s(2025), "A A".parse().unwrap())], 1);
    }

    #[test]
    fn keeps_top_five_per_season() {
        let names = ["P1 X", "P2 X", "P3 X", "P4 X", "P5 X", "P6 X", "P7 X"];
        let mut totals = SeasonTotals::new();
        for (i, n) in names.iter().enumerate() {
            totals.insert((s(2024), n.parse().unwrap()), 10 - i as u32);
        }
        totals.insert((s(2023), "Q Y".parse().unwrap()), 1);

        let board = top_k_per_season(&totals, LEADERBOARD_SIZE);
        assert_eq!(board.len(), 6);
        assert_eq!(board[0].season, s(2023));
        assert_eq!(board[0].rank, 1);
        let ranks: Vec<u32> = board[1..].iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(board[1].player_name.as_str(), "P1 X");
        assert_eq!(board[5].season_total_votes, 6);
    }

    #[test]
    fn ties_get_consecutive_ranks_in_name_order() {
        let mut totals = SeasonTotals::new();
        totals.insert((s(2024), "Zed Z".parse().unwrap()), 7);
        totals.insert((s(2024), "Amy A".parse().unwrap()), 7);
        totals.insert((s(2024), "Bob B".parse().unwrap()), 9);

        let board = top_k_per_season(&totals, LEADERBOARD_SIZE);
        let got: Vec<(&str, u32, u32)> = board
            .iter()
            .map(|e| (e.player_name.as_str(), e.season_total_votes, e.rank))
            .collect();
        assert_eq!(got, vec![("Bob B", 9, 1), ("Amy A", 7, 2), ("Zed Z", 7, 3)]);
    }

    #[test]
    fn empty_totals_give_empty_board() {
        assert!(top_k_per_season(&SeasonTotals::new(), LEADERBOARD_SIZE).is_empty());
    }

    proptest! {
        #[test]
        fn totals_match_brute_force_and_ranks_are_dense(
            rows in prop::collection::vec((0u8..6, 0i32..3, 0u8..4), 0..60)
        ) {
            let recs: Vec<GameRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, (p, _, _))| rec(i, &format!("Player {p}")))
                .collect();
            let seasons: Vec<Season> = rows.iter().map(|(_, y, _)| s(2020 + y)).collect();
            let votes: Vec<u8> = rows.iter().map(|(_, _, v)| *v).collect();

            let totals = season_totals(&recs, &seasons, &votes);
            for ((season, player), total) in &totals {
                let brute: u32 = (0..recs.len())
                    .filter(|&i| seasons[i] == *season && recs[i].player_name == *player)
                    .map(|i| votes[i] as u32)
                    .sum();
                prop_assert_eq!(*total, brute);
            }

            let board = top_k_per_season(&totals, LEADERBOARD_SIZE);
            let mut per_season: BTreeMap<Season, Vec<&SeasonLeaderboardEntry>> = BTreeMap::new();
            for e in &board {
                per_season.entry(e.season).or_default().push(e);
            }
            for (season, entries) in per_season {
                let players = totals.keys().filter(|(s2, _)| *s2 == season).count();
                prop_assert_eq!(entries.len(), players.min(LEADERBOARD_SIZE));
                for (i, e) in entries.iter().enumerate() {
                    prop_assert_eq!(e.rank as usize, i + 1);
                }
                for w in entries.windows(2) {
                    prop_assert!(w[0].season_total_votes >= w[1].season_total_votes);
                }
            }
        }
    }
}
