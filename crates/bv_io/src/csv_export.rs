//! Row export as CSV (header from the row type's field names), written atomically.

use std::path::Path;

use serde::Serialize;

use crate::{canonical_json::write_bytes_atomic, IoError};

/// Serialize `rows` as CSV bytes. An empty slice yields an empty buffer.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, IoError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    for row in rows {
        w.serialize(row)?;
    }
    w.into_inner().map_err(|e| IoError::Csv(e.to_string()))
}

pub fn write_csv_file<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), IoError> {
    let bytes = to_csv_bytes(rows)?;
    write_bytes_atomic(path, &bytes)?;
    Ok(())
}
