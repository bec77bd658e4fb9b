//! crates/bv_io/src/lib.rs
//! Single-source-of-truth I/O crate.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - The CSV data source (`loader`) and the weight configuration provider
//!   (`weights`) are the only places that touch user input.
//! - Canonical JSON + hashing back every artifact the engine writes.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for bv_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, ...)
    #[error("io/path error: {0}")]
    Path(String),

    /// Malformed CSV (bad quoting, ragged rows, non-UTF-8).
    #[error("csv error: {0}")]
    Csv(String),

    /// A required header is absent from the CSV.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A kept row's game date cannot be parsed as a calendar date.
    #[error("invalid date '{value}' at line {line}")]
    InvalidDate { line: u64, value: String },

    /// A kept row carries an unusable identity or outcome field.
    #[error("invalid {field} '{value}' at line {line}")]
    InvalidField { line: u64, field: &'static str, value: String },

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Weight configuration rejected (bad override syntax, non-finite values).
    #[error("config error: {0}")]
    Config(String),

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),
}

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column, not a pointer; report the root.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv(e.to_string())
    }
}

impl From<hasher::HashError> for IoError {
    fn from(e: hasher::HashError) -> Self {
        IoError::Hash(e.to_string())
    }
}

impl From<bv_core::errors::CoreError> for IoError {
    fn from(e: bv_core::errors::CoreError) -> Self {
        IoError::Config(e.to_string())
    }
}

pub mod canonical_json;
pub mod csv_export;
pub mod hasher;
pub mod loader;
pub mod weights;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
