//! bv_report: pure offline report model + renderers (text table, JSON).
//!
//! Rules:
//! - No I/O here. Callers supply artifacts already in memory.
//! - Renderers read the artifacts only; nothing is recomputed.
//! - Inputs are `serde_json::Value` so this crate stays decoupled from the
//!   pipeline's concrete document types.

#![deny(unsafe_code)]

use std::fmt;

use serde_json::Value;

#[cfg(feature = "render_json")]
mod render_json;
mod render_text;

#[cfg(feature = "render_json")]
pub use render_json::render_json;
pub use render_text::render_text;

pub type LeaderboardArtifact = Value;
pub type RunRecordArtifact = Value;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    MissingField(&'static str),
    Inconsistent(&'static str),
    Serialize(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingField(p) => write!(f, "missing field {p}"),
            ReportError::Inconsistent(m) => write!(f, "inconsistent artifact: {m}"),
            ReportError::Serialize(m) => write!(f, "serialize: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====
#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub summary: SectionSummary,
    pub seasons: Vec<SeasonBoard>,
    pub integrity: Option<SectionIntegrity>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionCover {
    pub title: String,
    pub leaderboard_id: String,
    pub formula_id: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionSummary {
    pub records: u64,
    pub games: u64,
    pub seasons: u64,
    pub players: u64,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonBoard {
    pub season: String,
    pub rows: Vec<BoardRow>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardRow {
    pub rank: u64,
    pub player: String,
    pub votes: u64,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionIntegrity {
    pub run_id: String,
    pub timestamp_utc: String,
    pub engine: String,
    pub records_sha256: String,
    pub weights_sha256: Option<String>,
}

// ===== API =====

/// Build the report model from the leaderboard and (optionally) the run record.
///
/// Entries must already be grouped by season with ranks ascending; the model
/// keeps that order and rejects boards where it is broken.
pub fn build_model(
    leaderboard: &LeaderboardArtifact,
    run: Option<&RunRecordArtifact>,
) -> Result<ReportModel, ReportError> {
    let cover = SectionCover {
        title: "Season vote leaderboard".to_string(),
        leaderboard_id: j_str(leaderboard, "/id")?,
        formula_id: j_str(leaderboard, "/formula_id")?,
    };

    let summary = SectionSummary {
        records: j_u64(leaderboard, "/summary/records")?,
        games: j_u64(leaderboard, "/summary/games")?,
        seasons: j_u64(leaderboard, "/summary/seasons")?,
        players: j_u64(leaderboard, "/summary/players")?,
    };

    let entries = leaderboard
        .pointer("/entries")
        .and_then(Value::as_array)
        .ok_or(ReportError::MissingField("/entries"))?;

    let mut seasons: Vec<SeasonBoard> = Vec::new();
    for e in entries {
        let season = j_str(e, "/season")?;
        let row = BoardRow {
            rank: j_u64(e, "/rank")?,
            player: j_str(e, "/player_name")?,
            votes: j_u64(e, "/season_total_votes")?,
        };
        match seasons.last_mut() {
            Some(board) if board.season == season => {
                let prev = board.rows.last().map(|r| r.rank).unwrap_or(0);
                if row.rank != prev + 1 {
                    return Err(ReportError::Inconsistent("ranks not consecutive within a season"));
                }
                board.rows.push(row);
            }
            _ => {
                if seasons.iter().any(|b| b.season == season) {
                    return Err(ReportError::Inconsistent("season entries not contiguous"));
                }
                if row.rank != 1 {
                    return Err(ReportError::Inconsistent("season board does not start at rank 1"));
                }
                seasons.push(SeasonBoard { season, rows: vec![row] });
            }
        }
    }

    let integrity = run.map(integrity_from_run).transpose()?;

    Ok(ReportModel { cover, summary, seasons, integrity })
}

fn integrity_from_run(run: &Value) -> Result<SectionIntegrity, ReportError> {
    let engine = format!(
        "{}/{} v{} ({})",
        j_str(run, "/engine/vendor")?,
        j_str(run, "/engine/name")?,
        j_str(run, "/engine/version")?,
        j_str(run, "/engine/build")?
    );
    Ok(SectionIntegrity {
        run_id: j_str(run, "/id")?,
        timestamp_utc: j_str(run, "/timestamp_utc")?,
        engine,
        records_sha256: j_str(run, "/inputs/records_sha256")?,
        weights_sha256: j_str(run, "/inputs/weights_sha256").ok(),
    })
}

// ===== Helpers =====

fn j_str(root: &Value, ptr: &'static str) -> Result<String, ReportError> {
    root.pointer(ptr)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ReportError::MissingField(ptr))
}

fn j_u64(root: &Value, ptr: &'static str) -> Result<u64, ReportError> {
    root.pointer(ptr).and_then(Value::as_u64).ok_or(ReportError::MissingField(ptr))
}
