// Packrun Exporter - CSV run reports
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Packrun Exporter
//!
//! Batch CLI: reads the plant database, derives run metrics per line, and
//! writes one CSV report per line.
//!
//! ## Usage
//!
//! ```bash
//! # Every line in the database, reports into ./reports
//! packrun-exporter --db plant_data.db --out reports
//!
//! # One line, stricter weight filtering
//! packrun-exporter --db plant_data.db --line line-7 --noise-floor 0.5
//! ```

mod export;

use clap::{Parser, ValueEnum};
use packrun::{process_line, PipelineConfig, ResetPolicy};
use packrun_store::PlantStore;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Packrun CSV exporter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plant database file
    #[arg(short, long, default_value = packrun_store::DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Line to process (repeatable; default: every line in the database)
    #[arg(short, long = "line")]
    lines: Vec<String>,

    /// Output directory for the CSV reports
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Weight noise floor: samples at or below this are ignored
    #[arg(long, default_value = "0.0")]
    noise_floor: f64,

    /// Counter reset handling
    #[arg(long, value_enum, default_value = "clamp")]
    reset_policy: ResetPolicyArg,

    /// Multiplier from raw weight units to reported mass units
    #[arg(long, default_value = "0.001")]
    unit_factor: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// CLI mapping for [`ResetPolicy`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResetPolicyArg {
    /// Resets contribute nothing to the normalized counter
    Clamp,
    /// Resets contribute the raw post-reset value
    Substitute,
}

impl From<ResetPolicyArg> for ResetPolicy {
    fn from(arg: ResetPolicyArg) -> Self {
        match arg {
            ResetPolicyArg::Clamp => ResetPolicy::ClampToZero,
            ResetPolicyArg::Substitute => ResetPolicy::SubstituteRaw,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!("Packrun Exporter v{}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig {
        reset_policy: args.reset_policy.into(),
        noise_floor: args.noise_floor,
        mass_unit_factor: args.unit_factor,
    };
    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let store = match PlantStore::open(&args.db) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open {}: {e}", args.db.display());
            return ExitCode::FAILURE;
        }
    };

    let lines = if args.lines.is_empty() {
        match store.line_ids() {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to enumerate lines: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        args.lines.clone()
    };

    if lines.is_empty() {
        warn!("No lines found in {}", args.db.display());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = std::fs::create_dir_all(&args.out) {
        error!("Failed to create {}: {e}", args.out.display());
        return ExitCode::FAILURE;
    }

    let mut exported = 0usize;
    for line_id in &lines {
        // A retrieval failure aborts this line only; the rest of the batch
        // continues. An error here is never reported as "no runs".
        let signals = match store.load_line(line_id) {
            Ok(signals) => signals,
            Err(e) => {
                error!("line {line_id}: retrieval failed: {e}");
                continue;
            }
        };

        let report = process_line(&signals, &config);

        if let Some(open) = &report.open_run {
            warn!(
                "line {line_id}: unterminated run starting at {} left out of the report",
                open.start_ms
            );
        }
        let flagged = report.runs.iter().filter(|run| !run.issues.is_empty()).count();
        if flagged > 0 {
            warn!("line {line_id}: {flagged} runs carry quality flags");
        }

        match export::export_report(&args.out, &report) {
            Ok(path) => {
                info!(
                    "line {line_id}: {} runs -> {}",
                    report.runs.len(),
                    path.display()
                );
                exported += 1;
            }
            Err(e) => error!("line {line_id}: export failed: {e}"),
        }
    }

    if exported == 0 {
        error!("No line was exported");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
