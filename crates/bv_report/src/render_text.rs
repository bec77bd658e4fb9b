//! Plain-text renderer: one fixed-width table, seasons ascending, ranks
//! ascending, followed by a short provenance footer.

use std::fmt::Write;

use crate::ReportModel;

const SEASON_W: usize = 6;
const RANK_W: usize = 4;
const VOTES_W: usize = 5;

pub fn render_text(model: &ReportModel) -> String {
    let player_w = model
        .seasons
        .iter()
        .flat_map(|s| s.rows.iter().map(|r| r.player.chars().count()))
        .max()
        .unwrap_or(0)
        .max("player".len());

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", model.cover.title);
    let _ = writeln!(
        out,
        "records: {}  games: {}  seasons: {}  players: {}",
        model.summary.records, model.summary.games, model.summary.seasons, model.summary.players
    );
    let _ = writeln!(out);

    if model.seasons.is_empty() {
        let _ = writeln!(out, "(no regular-season records)");
    } else {
        let _ = writeln!(
            out,
            "{:<SEASON_W$}  {:>RANK_W$}  {:<player_w$}  {:>VOTES_W$}",
            "season", "rank", "player", "votes"
        );
        let _ = writeln!(out, "{}", "-".repeat(SEASON_W + RANK_W + player_w + VOTES_W + 6));
        for board in &model.seasons {
            for row in &board.rows {
                let _ = writeln!(
                    out,
                    "{:<SEASON_W$}  {:>RANK_W$}  {:<player_w$}  {:>VOTES_W$}",
                    board.season, row.rank, row.player, row.votes
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "leaderboard: {}", model.cover.leaderboard_id);
    let _ = writeln!(out, "formula:     {}", model.cover.formula_id);
    if let Some(integ) = &model.integrity {
        let _ = writeln!(out, "run:         {}", integ.run_id);
        let _ = writeln!(out, "engine:      {}", integ.engine);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_model, fixtures};

    #[test]
    fn table_layout() {
        let m = build_model(&fixtures::leaderboard(), Some(&fixtures::run_record())).unwrap();
        let text = render_text(&m);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Season vote leaderboard");
        assert_eq!(lines[1], "records: 5  games: 2  seasons: 2  players: 3");
        assert_eq!(lines[3], "season  rank  player   votes");
        assert_eq!(lines[5], "2024       1  Bob Ray      5");
        assert_eq!(lines[7], "2025       1  Cy Ng        3");
        assert!(text.contains("run:         RUN:2025-01-01T00:00:00Z:beef"));
    }

    #[test]
    fn empty_board_says_so() {
        let mut lb = fixtures::leaderboard();
        lb["entries"] = serde_json::json!([]);
        let text = render_text(&build_model(&lb, None).unwrap());
        assert!(text.contains("(no regular-season records)"));
        assert!(!text.contains("run:"));
    }
}
