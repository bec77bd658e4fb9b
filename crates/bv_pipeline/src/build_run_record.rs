//! crates/bv_pipeline/src/build_run_record.rs
//! BUILD_RUN_RECORD: provenance for one run.
//!
//! - `timestamp_utc` is supplied by the caller and normalized to RFC3339
//!   seconds with `Z`; this crate never reads a clock.
//! - `id = "RUN:" + timestamp + ":" + sha256(canonical id-less record)`.
//! - Inputs echo raw file digests; outputs echo the leaderboard id and digest.

use bv_io::{canonical_json, hasher};
use serde::{Deserialize, Serialize};

use crate::{build_leaderboard::LeaderboardDoc, EngineMeta, PipelineError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub id: String,            // "RUN:<ts>:<hex64>"
    pub timestamp_utc: String, // RFC3339 Z
    pub engine: EngineMeta,
    pub formula_id: String,
    pub inputs: RunInputs,
    pub outputs: RunOutputs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInputs {
    pub records_sha256: String,
    /// Present when weights came from a file.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weights_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutputs {
    pub leaderboard_id: String,
    pub leaderboard_sha256: String,
}

#[derive(Serialize)]
struct RunNoId<'a> {
    timestamp_utc: &'a str,
    engine: &'a EngineMeta,
    formula_id: &'a str,
    inputs: &'a RunInputs,
    outputs: &'a RunOutputs,
}

impl RunRecordDoc {
    fn no_id(&self) -> RunNoId<'_> {
        RunNoId {
            timestamp_utc: &self.timestamp_utc,
            engine: &self.engine,
            formula_id: &self.formula_id,
            inputs: &self.inputs,
            outputs: &self.outputs,
        }
    }
}

pub fn build_run_record(
    timestamp_utc: &str,
    engine: EngineMeta,
    inputs: RunInputs,
    leaderboard: &LeaderboardDoc,
) -> Result<RunRecordDoc, PipelineError> {
    let ts = hasher::normalize_rfc3339_utc_seconds(timestamp_utc)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    let outputs = RunOutputs {
        leaderboard_id: leaderboard.id.clone(),
        leaderboard_sha256: leaderboard.sha256()?,
    };
    let mut rec = RunRecordDoc {
        id: String::new(),
        timestamp_utc: ts,
        engine,
        formula_id: leaderboard.formula_id.clone(),
        inputs,
        outputs,
    };
    rec.id = compute_run_id(&rec)?;
    Ok(rec)
}

fn compute_run_id(rec: &RunRecordDoc) -> Result<String, PipelineError> {
    let bytes = canonical_json::to_canonical_bytes(&rec.no_id())
        .map_err(|e| PipelineError::Build(format!("run record canonical bytes: {e}")))?;
    hasher::run_id_from_bytes(&rec.timestamp_utc, &bytes).map_err(|e| PipelineError::Build(e.to_string()))
}

/// Recompute the run id and check the record points at `leaderboard`.
pub fn verify_run_record(rec: &RunRecordDoc, leaderboard: &LeaderboardDoc) -> Result<(), PipelineError> {
    let expected = compute_run_id(rec)?;
    if expected != rec.id {
        return Err(PipelineError::SelfVerify(format!(
            "run id mismatch: recorded {}, computed {expected}",
            rec.id
        )));
    }
    if rec.outputs.leaderboard_id != leaderboard.id || rec.outputs.leaderboard_sha256 != leaderboard.sha256()? {
        return Err(PipelineError::SelfVerify("run record does not reference this leaderboard".into()));
    }
    Ok(())
}
