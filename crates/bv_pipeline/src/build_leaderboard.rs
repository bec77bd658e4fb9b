//! crates/bv_pipeline/src/build_leaderboard.rs
//! BUILD_LEADERBOARD: assemble the id-less payload, hash it canonically into
//! `LB:<sha256>`, and re-check the id before handing the document out.
//!
//! The document carries no timestamp, so identical inputs and weights always
//! produce byte-identical canonical output.

use bv_core::{determinism::is_sorted_by, SeasonLeaderboardEntry};
use bv_io::{canonical_json, hasher};
use serde::{Deserialize, Serialize};

use crate::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardDoc {
    pub id: String,         // "LB:<hex64>"
    pub formula_id: String, // 64-hex
    pub summary: LeaderboardSummary,
    pub entries: Vec<SeasonLeaderboardEntry>, // season ↑, rank ↑
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSummary {
    pub records: u64,
    pub games: u64,
    pub seasons: u64,
    pub players: u64,
}

#[derive(Serialize)]
struct LeaderboardNoId<'a> {
    formula_id: &'a str,
    summary: &'a LeaderboardSummary,
    entries: &'a [SeasonLeaderboardEntry],
}

impl LeaderboardDoc {
    fn no_id(&self) -> LeaderboardNoId<'_> {
        LeaderboardNoId { formula_id: &self.formula_id, summary: &self.summary, entries: &self.entries }
    }

    /// SHA-256 of the full canonical document (the bytes written to disk).
    pub fn sha256(&self) -> Result<String, PipelineError> {
        let bytes = canonical_json::to_canonical_bytes(self)
            .map_err(|e| PipelineError::Build(format!("leaderboard canonical bytes: {e}")))?;
        Ok(hasher::sha256_hex(&bytes))
    }
}

pub fn build_leaderboard(
    formula_id: String,
    summary: LeaderboardSummary,
    entries: Vec<SeasonLeaderboardEntry>,
) -> Result<LeaderboardDoc, PipelineError> {
    if !is_sorted_by(&entries, |a, b| (a.season, a.rank).cmp(&(b.season, b.rank))) {
        return Err(PipelineError::Build("leaderboard entries out of (season, rank) order".into()));
    }
    let mut doc = LeaderboardDoc { id: String::new(), formula_id, summary, entries };
    doc.id = hasher::lb_id_from_canonical(&doc.no_id())
        .map_err(|e| PipelineError::Build(format!("leaderboard id: {e}")))?;
    verify_leaderboard_id(&doc)?;
    Ok(doc)
}

/// Recompute the id from the document body and compare.
pub fn verify_leaderboard_id(doc: &LeaderboardDoc) -> Result<(), PipelineError> {
    let expected = hasher::lb_id_from_canonical(&doc.no_id())
        .map_err(|e| PipelineError::Build(format!("leaderboard id: {e}")))?;
    if expected != doc.id {
        return Err(PipelineError::SelfVerify(format!(
            "leaderboard id mismatch: recorded {}, computed {expected}",
            doc.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_core::Season;

    fn entry(name: &str, votes: u32, rank: u32) -> SeasonLeaderboardEntry {
        SeasonLeaderboardEntry {
            season: Season::from_ending_year(2024),
            player_name: name.parse().unwrap(),
            season_total_votes: votes,
            rank,
        }
    }

    fn summary() -> LeaderboardSummary {
        LeaderboardSummary { records: 4, games: 2, seasons: 1, players: 2 }
    }

    #[test]
    fn id_is_stable_and_content_addressed() {
        let a = build_leaderboard("f".repeat(64), summary(), vec![entry("Ann Lee", 5, 1)]).unwrap();
        let b = build_leaderboard("f".repeat(64), summary(), vec![entry("Ann Lee", 5, 1)]).unwrap();
        let c = build_leaderboard("f".repeat(64), summary(), vec![entry("Ann Lee", 6, 1)]).unwrap();
        assert!(a.id.starts_with("LB:"));
        assert_eq!(a.id.len(), 3 + 64);
        assert_eq!(a, b);
        assert_ne!(a.id, c.id);
        assert_eq!(a.sha256().unwrap(), b.sha256().unwrap());
    }

    #[test]
    fn tampered_document_fails_verification() {
        let mut doc = build_leaderboard("0".repeat(64), summary(), vec![entry("Ann Lee", 5, 1)]).unwrap();
        doc.entries[0].season_total_votes = 9;
        assert!(matches!(verify_leaderboard_id(&doc), Err(PipelineError::SelfVerify(_))));
    }

    #[test]
    fn unordered_entries_are_rejected() {
        let err = build_leaderboard("0".repeat(64), summary(), vec![entry("Bob Ray", 4, 2), entry("Ann Lee", 5, 1)])
            .unwrap_err();
        assert!(matches!(err, PipelineError::Build(_)));
    }

    #[test]
    fn serialized_shape() {
        let doc = build_leaderboard("0".repeat(64), summary(), vec![entry("Ann Lee", 5, 1)]).unwrap();
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["entries"][0]["season"], "2024");
        assert_eq!(v["entries"][0]["player_name"], "Ann Lee");
        assert_eq!(v["entries"][0]["season_total_votes"], 5);
        assert_eq!(v["summary"]["games"], 2);
    }
}
