//! Loader: read a local player-game CSV, keep regular-season rows, and return
//! typed `GameRecord`s for the pipeline. No network I/O.
//!
//! Column contract:
//! - Required: `firstName`, `lastName`, `gameId`, `gameDate`, `gameType`, `win`.
//! - Every other column is a candidate statistic. A cell that parses as a
//!   finite number becomes `statistics[column]`; empty, `NaN` and textual cells
//!   are left absent. Absence only matters if the statistic is weighted.
//! - Rows whose `gameType` is not exactly `"Regular Season"` are dropped before
//!   any other field is looked at.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use bv_core::{GameId, GameRecord, PlayerName};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::{hasher, IoError};

pub const COL_FIRST_NAME: &str = "firstName";
pub const COL_LAST_NAME: &str = "lastName";
pub const COL_GAME_ID: &str = "gameId";
pub const COL_GAME_DATE: &str = "gameDate";
pub const COL_GAME_TYPE: &str = "gameType";
pub const COL_WIN: &str = "win";

const REQUIRED: [&str; 6] = [
    COL_FIRST_NAME,
    COL_LAST_NAME,
    COL_GAME_ID,
    COL_GAME_DATE,
    COL_GAME_TYPE,
    COL_WIN,
];

/// Only rows with this game type enter the engine.
pub const REGULAR_SEASON: &str = "Regular Season";

/// Records plus provenance of the file they came from.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<GameRecord>,
    /// Data rows read (header excluded).
    pub rows_read: usize,
    /// SHA-256 of the raw file bytes.
    pub sha256: String,
}

impl LoadedRecords {
    pub fn rows_kept(&self) -> usize {
        self.records.len()
    }
}

/// Load and filter records from a CSV file on disk.
pub fn load_records(path: &Path) -> Result<LoadedRecords, IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let sha256 = hasher::sha256_hex(&bytes);
    let (records, rows_read) = load_records_from_reader(bytes.as_slice())?;
    info!(
        path = %path.display(),
        rows_read,
        rows_kept = records.len(),
        "loaded regular-season records"
    );
    Ok(LoadedRecords { records, rows_read, sha256 })
}

/// Parse records from any reader. Returns `(kept records, data rows read)`.
pub fn load_records_from_reader<R: Read>(rdr: R) -> Result<(Vec<GameRecord>, usize), IoError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    for row in reader.records() {
        let row = row?;
        rows_read += 1;
        if row.get(layout.game_type).map(str::trim) != Some(REGULAR_SEASON) {
            continue;
        }
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let rec = parse_row(&row, &layout, line, records.len())?;
        records.push(rec);
    }

    debug!(rows_read, rows_kept = records.len(), "csv scan complete");
    Ok((records, rows_read))
}

/* ----------------------------- Row parsing ----------------------------- */

struct ColumnLayout {
    first_name: usize,
    last_name: usize,
    game_id: usize,
    game_date: usize,
    game_type: usize,
    win: usize,
    /// (column index, header) for every non-required column.
    stats: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IoError> {
        let find = |name: &'static str| {
            headers.iter().position(|h| h == name).ok_or(IoError::MissingColumn(name))
        };
        let stats = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED.contains(h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();
        Ok(ColumnLayout {
            first_name: find(COL_FIRST_NAME)?,
            last_name: find(COL_LAST_NAME)?,
            game_id: find(COL_GAME_ID)?,
            game_date: find(COL_GAME_DATE)?,
            game_type: find(COL_GAME_TYPE)?,
            win: find(COL_WIN)?,
            stats,
        })
    }
}

fn parse_row(
    row: &csv::StringRecord,
    layout: &ColumnLayout,
    line: u64,
    row_index: usize,
) -> Result<GameRecord, IoError> {
    let raw = |i: usize| row.get(i).unwrap_or("");
    let cell = |i: usize| raw(i).trim();

    let invalid = |field: &'static str, value: &str| IoError::InvalidField {
        line,
        field,
        value: value.to_string(),
    };

    // Identity cells are taken verbatim.
    let game_id: GameId = raw(layout.game_id)
        .parse()
        .map_err(|_| invalid(COL_GAME_ID, raw(layout.game_id)))?;

    let player_name = PlayerName::from_parts(raw(layout.first_name), raw(layout.last_name))
        .map_err(|_| {
            invalid(
                "player name",
                &format!("{} {}", raw(layout.first_name), raw(layout.last_name)),
            )
        })?;

    let raw_date = cell(layout.game_date);
    let date = parse_game_date(raw_date)
        .ok_or_else(|| IoError::InvalidDate { line, value: raw_date.to_string() })?;

    let raw_win = cell(layout.win);
    let win = parse_win(raw_win).ok_or_else(|| invalid(COL_WIN, raw_win))?;

    let mut statistics = BTreeMap::new();
    for (i, name) in &layout.stats {
        if let Some(v) = parse_stat(cell(*i)) {
            statistics.insert(name.clone(), v);
        }
    }

    Ok(GameRecord { row_index, game_id, player_name, date, win, statistics })
}

/// Calendar date from the encodings seen in exported game logs.
/// The date is taken as written; offsets are not applied.
pub fn parse_game_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Accepts `1`/`0`, `1.0`/`0.0`, `true`/`false` (any case).
pub fn parse_win(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_stat(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
