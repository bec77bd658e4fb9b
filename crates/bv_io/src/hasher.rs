//! crates/bv_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: sorted object keys, array order preserved.
//! - IDs derive from canonical bytes: `LB:` (leaderboard), and `RUN:` uses an
//!   RFC3339-UTC timestamp plus a hash of the canonical run bytes.
//! - The formula id is the digest of the canonical weight configuration.
//! - Hex digests are **lowercase**.
//!
//! Use `sha256_canonical(..)` for JSON values/structs and `sha256_hex(..)` /
//! `sha256_file(..)` for raw bytes/files.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bv_core::WeightConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::canonical_json::to_canonical_json_bytes;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid timestamp (expected RFC3339 UTC like 2025-08-12T10:00:00Z): {0}")]
    InvalidTimestamp(String),
}

/* ---------------------------- Canonical hashing ---------------------------- */

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, HashError> {
    let v = serde_json::to_value(value)?;
    Ok(sha256_hex(&to_canonical_json_bytes(&v)?))
}

/* ------------------------------- Raw hashing ------------------------------- */

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over a reader stream (raw, not canonicalized).
pub fn sha256_stream<R: Read>(reader: &mut R) -> Result<String, HashError> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 256 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_file(path: &Path) -> Result<String, HashError> {
    let f = File::open(path)?;
    sha256_stream(&mut BufReader::new(f))
}

/* ---------------------------- Artifact ID builders ---------------------------- */

/// Formula id: digest of the canonical weight configuration.
pub fn formula_id(cfg: &WeightConfig) -> Result<String, HashError> {
    sha256_canonical(cfg)
}

/// `LB:<hex>` is the ID for `leaderboard.json` derived from its id-less canonical bytes.
pub fn lb_id_from_canonical<T: Serialize>(value: &T) -> Result<String, HashError> {
    Ok(format!("LB:{}", sha256_canonical(value)?))
}

/// Normalize an RFC3339 timestamp to UTC seconds with trailing `Z`.
pub fn normalize_rfc3339_utc_seconds(ts: &str) -> Result<String, HashError> {
    let dt = DateTime::parse_from_rfc3339(ts.trim())
        .map_err(|_| HashError::InvalidTimestamp(ts.to_string()))?;
    Ok(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// `RUN:<timestamp>:<hex>` is the ID for `run_record.json`.
pub fn run_id_from_bytes(timestamp_utc: &str, run_bytes_canonical: &[u8]) -> Result<String, HashError> {
    let ts = normalize_rfc3339_utc_seconds(timestamp_utc)?;
    Ok(format!("RUN:{ts}:{}", sha256_hex(run_bytes_canonical)))
}
