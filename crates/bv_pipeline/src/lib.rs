//! bv_pipeline: deterministic pipeline surface (load → tabulate → allocate → aggregate → build)
//!
//! This crate stays free of direct file handling: loading, canonical JSON and hashing
//! are delegated to `bv_io`, the math to `bv_algo`. It never reads a clock; the
//! run timestamp is part of the context.

use std::collections::BTreeSet;
use std::path::Path;

use bv_algo::{AllocError, ScoreError, LEADERBOARD_SIZE};
use bv_core::{GameRecord, WeightConfig};
use bv_io::{hasher, loader, weights, IoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod aggregate;
pub mod allocate;
pub mod annotate;
pub mod build_leaderboard;
pub mod build_run_record;
pub mod tabulate;

pub use annotate::AnnotatedRecord;
pub use build_leaderboard::{LeaderboardDoc, LeaderboardSummary};
pub use build_run_record::{RunInputs, RunOutputs, RunRecordDoc};

/// Engine identifiers recorded in every run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Filesystem problems reading inputs.
    #[error("io: {0}")]
    Io(String),
    /// Malformed record data (CSV shape, missing column, bad date or flag).
    #[error("input: {0}")]
    Input(String),
    /// Weight configuration rejected.
    #[error("config: {0}")]
    Config(String),
    /// A weighted statistic is absent from a record.
    #[error("score: {0}")]
    Score(#[from] ScoreError),
    /// Canonicalization/hashing failures while assembling artifacts.
    #[error("build: {0}")]
    Build(String),
    /// An artifact id does not match its recomputed value.
    #[error("self-verify: {0}")]
    SelfVerify(String),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        use PipelineError::*;
        match e {
            IoError::Path(m) => Io(m),
            e @ (IoError::Csv(_)
            | IoError::MissingColumn(_)
            | IoError::InvalidDate { .. }
            | IoError::InvalidField { .. }) => Input(e.to_string()),
            e @ (IoError::Json { .. } | IoError::Config(_)) => Config(e.to_string()),
            IoError::Hash(m) => Build(format!("hash: {m}")),
        }
    }
}

impl From<AllocError> for PipelineError {
    fn from(e: AllocError) -> Self {
        PipelineError::Build(format!("allocate: {e}"))
    }
}

/* ---------------------------------- Inputs ---------------------------------- */

/// Where to load inputs from and what to override on top of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions<'a> {
    pub weights_path: Option<&'a Path>,
    pub weight_overrides: &'a [(String, f64)],
    pub win_multiplier: Option<f64>,
}

/// Records and weights as handed over by the collaborators.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub records: loader::LoadedRecords,
    pub weights: WeightConfig,
    pub weights_sha256: Option<String>,
}

/// Load records and resolve the weight configuration. Out-of-range weights are
/// logged and accepted.
pub fn load_inputs(records_path: &Path, opts: &LoadOptions<'_>) -> Result<LoadedInputs, PipelineError> {
    let (base, weights_sha256) = match opts.weights_path {
        Some(p) => {
            let (cfg, sha) = weights::load_weights(p)?;
            (cfg, Some(sha))
        }
        None => (weights::default_config(), None),
    };
    let cfg = weights::apply_overrides(base, opts.weight_overrides, opts.win_multiplier)?;
    for w in weights::out_of_range(&cfg) {
        warn!("{w}");
    }

    let records = loader::load_records(records_path)?;
    Ok(LoadedInputs { records, weights: cfg, weights_sha256 })
}

/// Counts reported by a validate-only pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub rows_read: usize,
    pub records: usize,
    pub games: usize,
    pub seasons: usize,
}

/// Check that every weighted statistic is present on every record, without
/// building artifacts.
pub fn validate_inputs(inputs: &LoadedInputs) -> Result<ValidationSummary, PipelineError> {
    let records = &inputs.records.records;
    let tab = tabulate::tabulate(records, &inputs.weights)?;
    let games: BTreeSet<_> = records.iter().map(|r| &r.game_id).collect();
    let seasons: BTreeSet<_> = tab.seasons.iter().collect();
    Ok(ValidationSummary {
        rows_read: inputs.records.rows_read,
        records: records.len(),
        games: games.len(),
        seasons: seasons.len(),
    })
}

/* --------------------------------- Pipeline --------------------------------- */

/// Pipeline context: inputs already loaded by `bv_io`.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub records: Vec<GameRecord>,
    pub weights: WeightConfig,
    pub records_sha256: String,
    pub weights_sha256: Option<String>,
    pub engine_meta: EngineMeta,
    /// RFC3339; normalized to UTC seconds in the run record.
    pub timestamp_utc: String,
}

impl PipelineCtx {
    pub fn from_inputs(inputs: LoadedInputs, engine_meta: EngineMeta, timestamp_utc: impl Into<String>) -> Self {
        PipelineCtx {
            records: inputs.records.records,
            weights: inputs.weights,
            records_sha256: inputs.records.sha256,
            weights_sha256: inputs.weights_sha256,
            engine_meta,
            timestamp_utc: timestamp_utc.into(),
        }
    }
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub leaderboard: LeaderboardDoc,
    pub run_record: RunRecordDoc,
    /// Input order, one row per record.
    pub records: Vec<AnnotatedRecord>,
}

/// Orchestrate the stages over a preloaded context. Any stage error aborts
/// the run; no partial leaderboard is produced.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    let records = &ctx.records;
    if records.is_empty() {
        warn!("no regular-season records; the leaderboard will be empty");
    }

    let formula_id = hasher::formula_id(&ctx.weights).map_err(|e| PipelineError::Build(e.to_string()))?;
    debug!(%formula_id, "formula id computed");

    let tab = tabulate::tabulate(records, &ctx.weights)?;
    let alloc = allocate::allocate(records, &tab)?;
    let agg = aggregate::aggregate(records, &tab, &alloc, LEADERBOARD_SIZE);

    let summary = LeaderboardSummary {
        records: records.len() as u64,
        games: alloc.games as u64,
        seasons: agg.seasons().len() as u64,
        players: agg.players().len() as u64,
    };
    let annotated = annotate::annotate(records, &tab, &alloc, &agg);
    let leaderboard = build_leaderboard::build_leaderboard(formula_id, summary, agg.entries)?;

    let inputs = RunInputs { records_sha256: ctx.records_sha256, weights_sha256: ctx.weights_sha256 };
    let run_record = build_run_record::build_run_record(&ctx.timestamp_utc, ctx.engine_meta, inputs, &leaderboard)?;
    build_run_record::verify_run_record(&run_record, &leaderboard)?;

    info!(
        records = summary.records,
        games = summary.games,
        seasons = summary.seasons,
        entries = leaderboard.entries.len(),
        leaderboard_id = %leaderboard.id,
        "run complete"
    );

    Ok(PipelineOutputs { leaderboard, run_record, records: annotated })
}

/// Convenience entry: load from paths with default overrides, then run.
pub fn run_from_paths(
    records_path: &Path,
    weights_path: Option<&Path>,
    timestamp_utc: &str,
) -> Result<PipelineOutputs, PipelineError> {
    let opts = LoadOptions { weights_path, ..Default::default() };
    let inputs = load_inputs(records_path, &opts)?;
    run_with_ctx(PipelineCtx::from_inputs(inputs, engine_identifiers(), timestamp_utc))
}

/// Engine identifiers (compile-time env where available, package defaults otherwise).
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: option_env!("BV_ENGINE_VENDOR").unwrap_or("bv").to_string(),
        name: option_env!("BV_ENGINE_NAME").unwrap_or("bv_engine").to_string(),
        version: option_env!("BV_ENGINE_VERSION")
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
        build: option_env!("BV_ENGINE_BUILD").unwrap_or("dev").to_string(),
    }
}
