// crates/bv_cli/src/main.rs
//
// Exit codes, typed error mapping, logging init, and the three modes:
// print-defaults, validate-only, and the full run
// (load → pipeline → artifacts → self-check → optional rendering).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, malformed data, missing statistics, rejected weights.
    pub const VALIDATION: i32 = 2;
    /// Artifact id or digest does not match its recomputed value.
    pub const SELF_VERIFY: i32 = 3;
    pub const IO: i32 = 4;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use chrono::{SecondsFormat, Utc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};
use bv_io::{canonical_json, csv_export, hasher, weights};
use bv_pipeline::{
    engine_identifiers, load_inputs, run_with_ctx, validate_inputs, LoadOptions, PipelineCtx,
    PipelineError, PipelineOutputs,
};
use bv_report::{build_model, render_text, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    SelfVerify(String),
    Io(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "{m}"),
            MainError::SelfVerify(m) => write!(f, "self-verify failed: {m}"),
            MainError::Io(m) => write!(f, "{m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("bv: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(&args);

    let res = if args.print_defaults {
        print_defaults()
    } else if args.validate_only {
        validate_only(&args)
    } else {
        run_once(&args)
    };

    let rc = match res {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr logging; RUST_LOG wins over the flag-derived default.
fn init_tracing(args: &Args) {
    let default = if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::SelfVerify(_) => SELF_VERIFY,
        MainError::Io(_) => IO,
        MainError::Render(_) => IO,
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Io(m) => MainError::Io(m),
        Input(m) | Config(m) => MainError::Validation(m),
        Score(s) => MainError::Validation(s.to_string()),
        Build(m) | SelfVerify(m) => MainError::SelfVerify(m),
    }
}

fn map_io_err(what: &str, e: bv_io::IoError) -> MainError {
    MainError::Io(format!("write {what}: {e}"))
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

/* ----------------------------------- Modes ----------------------------------- */

fn print_defaults() -> Result<(), MainError> {
    let cfg = weights::default_config();
    let text = serde_json::to_string_pretty(&cfg).map_err(|e| MainError::Io(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn load_options(args: &Args) -> LoadOptions<'_> {
    LoadOptions {
        weights_path: args.weights.as_deref(),
        weight_overrides: &args.weight,
        win_multiplier: args.win_multiplier,
    }
}

fn input_path(args: &Args) -> Result<&Path, MainError> {
    args.input
        .as_deref()
        .ok_or_else(|| MainError::Validation("missing required flag: --input".into()))
}

/// Load + statistic check, no artifacts.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let inputs = load_inputs(input_path(args)?, &load_options(args)).map_err(map_pipeline_err)?;
    let s = validate_inputs(&inputs).map_err(map_pipeline_err)?;
    info!(
        rows_read = s.rows_read,
        records = s.records,
        games = s.games,
        seasons = s.seasons,
        "validate-only: inputs OK"
    );
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let inputs = load_inputs(input_path(args)?, &load_options(args)).map_err(map_pipeline_err)?;

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let ctx = PipelineCtx::from_inputs(inputs, engine_identifiers(), timestamp);
    let outs = run_with_ctx(ctx).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &outs, args.emit_records)?;
    verify_written(&args.out, &outs)?;
    maybe_render_reports(args, &outs)?;

    info!(out = %args.out.display(), "artifacts written");
    Ok(())
}

/* --------------------------------- Artifacts --------------------------------- */

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs, emit_records: bool) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;

    canonical_json::write_canonical_file(&out_dir.join("leaderboard.json"), &outs.leaderboard)
        .map_err(|e| map_io_err("leaderboard.json", e))?;
    canonical_json::write_canonical_file(&out_dir.join("run_record.json"), &outs.run_record)
        .map_err(|e| map_io_err("run_record.json", e))?;

    if emit_records {
        csv_export::write_csv_file(&out_dir.join("records.csv"), &outs.records)
            .map_err(|e| map_io_err("records.csv", e))?;
    }
    Ok(())
}

/// Re-read leaderboard.json and check it against the digest the run record carries.
fn verify_written(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    let path = out_dir.join("leaderboard.json");
    let on_disk = hasher::sha256_file(&path).map_err(|e| MainError::Io(format!("read {}: {e}", path.display())))?;
    if on_disk != outs.run_record.outputs.leaderboard_sha256 {
        return Err(MainError::SelfVerify(format!(
            "leaderboard.json digest {on_disk} differs from run record {}",
            outs.run_record.outputs.leaderboard_sha256
        )));
    }
    Ok(())
}

fn maybe_render_reports(args: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }

    // Build in-memory report model from the canonical artifacts
    let lb_val = serde_json::to_value(&outs.leaderboard)
        .map_err(|e| MainError::Render(format!("leaderboard to JSON: {e}")))?;
    let run_val = serde_json::to_value(&outs.run_record)
        .map_err(|e| MainError::Render(format!("run_record to JSON: {e}")))?;
    let model = build_model(&lb_val, Some(&run_val)).map_err(map_report_err)?;

    for fmt in &args.render {
        match fmt.as_str() {
            "text" => render_text_report(&model, &args.out)?,
            "json" => render_json_report(&model, &args.out)?,
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn render_text_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    let text = render_text(model);
    canonical_json::write_bytes_atomic(&out_dir.join("report.txt"), text.as_bytes())
        .map_err(|e| MainError::Io(format!("write report.txt: {e}")))?;
    print!("{text}");
    Ok(())
}

// Always accept the concrete model type; gate body by feature.
fn render_json_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let text = bv_report::render_json(model).map_err(map_report_err)?;
        canonical_json::write_bytes_atomic(&out_dir.join("report.json"), text.as_bytes())
            .map_err(|e| MainError::Io(format!("write report.json: {e}")))
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Render(
            "json renderer not enabled (build with feature `report-json`)".into(),
        ))
    }
}
