// crates/bv_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --input is required unless --print-defaults is given
// - --weight NAME=VALUE may repeat; later entries win
// - Output: --out dir, --render [text|json]*, --emit-records for records.csv
// - --validate-only loads inputs and checks statistics without writing artifacts

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "bv",
    disable_help_subcommand = true,
    about = "Offline, deterministic season vote leaderboard from player-game statistics"
)]
pub struct Args {
    // --- Inputs ---
    /// Player-game statistics CSV.
    #[arg(long, required_unless_present = "print_defaults")]
    pub input: Option<PathBuf>,

    /// Weight file JSON: {"weights": {...}, "win_multiplier": x}. Defaults apply when omitted.
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// Override one statistic weight (repeatable).
    #[arg(long = "weight", value_name = "NAME=VALUE", value_parser = parse_weight_override)]
    pub weight: Vec<(String, f64)>,

    /// Override the win multiplier.
    #[arg(long, value_name = "X", allow_negative_numbers = true)]
    pub win_multiplier: Option<f64>,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Renderer(s) to emit. Choose up to 2 (text, json). Omit to skip rendering.
    #[arg(long, value_parser = ["text", "json"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Also write records.csv (every record with season, score, votes).
    #[arg(long)]
    pub emit_records: bool,

    // --- Modes ---
    /// Load and check inputs only; write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Print the default weight configuration as JSON and exit.
    #[arg(long, conflicts_with_all = ["validate_only", "weights"])]
    pub print_defaults: bool,

    // --- Logging ---
    /// Only log warnings and errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log stage progress.
    #[arg(long)]
    pub verbose: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// `NAME=VALUE` parser for `--weight`.
pub fn parse_weight_override(s: &str) -> Result<(String, f64), String> {
    bv_io::weights::parse_override(s).map_err(|e| e.to_string())
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    bv_io::looks_like_url_strict(&lower)
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if has_scheme(&p.to_string_lossy()) {
        return Err(CliError::NonLocalPath(p.display().to_string()));
    }
    Ok(())
}

fn ensure_local_exists(p: &Path, flag: &'static str) -> Result<(), CliError> {
    if !p.is_file() {
        return Err(CliError::NotFound(format!("{flag} {}", p.display())));
    }
    Ok(())
}

fn iter_all_paths(a: &Args) -> impl Iterator<Item = &PathBuf> {
    a.input.iter().chain(a.weights.iter()).chain(std::iter::once(&a.out))
}

/// Parse process args, then validate.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Scheme rejection, existence checks, and path normalization.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    if args.print_defaults {
        return Ok(args);
    }

    let input = args.input.as_ref().ok_or(CliError::Missing("--input"))?;
    ensure_local_exists(input, "--input")?;
    if let Some(w) = &args.weights {
        ensure_local_exists(w, "--weights")?;
    }

    args.input = args.input.take().map(|p| normalize_path(&p));
    args.weights = args.weights.take().map(|p| normalize_path(&p));
    // Normalize output directory even if it doesn't exist yet
    args.out = normalize_path(&args.out);

    Ok(args)
}

fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
