mod exit_codes;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crosscheck_recon::model::Row;
use crosscheck_recon::source::load_csv_rows;
use crosscheck_recon::{run, ReconConfig, ReconError};
use crosscheck_sheet::{MemorySink, ReportWriter, WriteThrottle};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "xcheck")]
#[command(about = "Reconcile two tabular sources against a shared composite key")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation described by a TOML config
    #[command(after_help = "\
Examples:
  xcheck run -c nightly.toml
  xcheck run -c nightly.toml -o result.json --report report.csv
  XCHECK_CONFIG=nightly.toml xcheck run")]
    Run {
        /// Path to the reconciliation config (source paths resolve
        /// relative to it)
        #[arg(long, short = 'c', env = "XCHECK_CONFIG")]
        config: PathBuf,

        /// Write the full result as JSON (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also render the report worksheet and write it as CSV
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Parse and validate a config without touching any source
    Validate {
        /// Path to the reconciliation config
        #[arg(long, short = 'c', env = "XCHECK_CONFIG")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, output, report } => cmd_run(config, output, report),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    fn config(err: ReconError) -> Self {
        let code = match err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            _ => EXIT_RUNTIME,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    config_path: PathBuf,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));

    let primary = load_source(base, &config.sources.primary.file, &config)?;
    let secondary = load_source(base, &config.sources.secondary.file, &config)?;
    tracing::info!(
        name = %config.name,
        primary_rows = primary.len(),
        secondary_rows = secondary.len(),
        "starting reconciliation"
    );

    let result = run(&config, primary, secondary).map_err(|e| CliError::runtime(e.to_string()))?;

    let s = &result.summary;
    eprintln!(
        "{}: {} matched, {} mismatch groups, {} outlier groups, {} invalid groups, {} dropped",
        config.name,
        s.matches,
        s.mismatch_groups,
        s.outlier_groups,
        s.invalid_groups,
        s.dropped_primary + s.dropped_secondary,
    );

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("serializing result: {}", e)))?;
    match output {
        Some(path) => fs::write(&path, json.as_bytes())
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    if let Some(path) = report {
        write_report_csv(&path, &config, &result)?;
    }

    Ok(())
}

/// Render the report into an in-memory worksheet and dump it as CSV.
fn write_report_csv(
    path: &Path,
    config: &ReconConfig,
    result: &crosscheck_recon::ReconResult,
) -> Result<(), CliError> {
    let mut sink = MemorySink::new();
    let throttle = WriteThrottle::from_config(&config.throttle);
    ReportWriter::new(&mut sink, &throttle, config)
        .write_report(config, result)
        .map_err(|e| CliError::runtime(e.to_string()))?;

    let csv = sink
        .to_csv(&config.report.sheet_title)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    fs::write(path, csv).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    println!("{}: config ok", config.name);
    Ok(())
}

// ============================================================================
// shared helpers
// ============================================================================

fn load_config(path: &Path) -> Result<ReconConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::io(format!("{}: {}", path.display(), e))
            .with_hint("pass --config or set XCHECK_CONFIG")
    })?;
    ReconConfig::from_toml(&text).map_err(CliError::config)
}

fn load_source(base: &Path, file: &str, config: &ReconConfig) -> Result<Vec<Row>, CliError> {
    let path = base.join(file);
    let data = fs::read_to_string(&path)
        .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    load_csv_rows(&data, &config.trim).map_err(|e| CliError::runtime(e.to_string()))
}
