//! Command-line front end: simulate data, fit OLS, bootstrap the slope SE.
//!
//! # Usage
//!
//! ```bash
//! # Print the JSON report to stdout
//! ols-bootstrap --n 200 --b 1000 --seed 17
//!
//! # Parallel refits, write report and data
//! ols-bootstrap --n 200 --b 1000 --parallel --workers 4 \
//!   --out artifacts/result.json --save-data artifacts/data.csv
//!
//! # Bootstrap an existing dataset into a timestamped artifacts directory
//! ols-bootstrap --data measurements.csv --b 2000 --log
//!
//! # Parameters from a JSON file, with a flag overriding one of them
//! ols-bootstrap --params run.json --b 500
//! ```

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ols_bootstrap::output::artifacts::{ArtifactDir, DEFAULT_ROOT};
use ols_bootstrap::output::{csv, json, terminal, OutputError};
use ols_bootstrap::pipeline::unix_millis;
use ols_bootstrap::{run, run_on, DataSource, RawParams};

/// Simulate linear regression data and estimate the bootstrap SE of the OLS slope.
#[derive(Parser, Debug)]
#[command(name = "ols-bootstrap")]
#[command(version)]
struct Args {
    /// Number of observations to simulate (taken from the file with --data)
    #[arg(long = "n", alias = "N", allow_negative_numbers = true)]
    n: Option<i64>,

    /// Number of bootstrap resamples
    #[arg(long = "b", alias = "B", allow_negative_numbers = true)]
    b: Option<i64>,

    /// True intercept beta_0 [default: 1.0]
    #[arg(long, alias = "beta0", allow_negative_numbers = true)]
    intercept: Option<f64>,

    /// True slope beta_1 [default: 2.0]
    #[arg(long, alias = "beta1", allow_negative_numbers = true)]
    slope: Option<f64>,

    /// Standard deviation of x [default: 1.0]
    #[arg(long, allow_negative_numbers = true)]
    x_sigma: Option<f64>,

    /// Standard deviation of the noise [default: 1.0]
    #[arg(long, allow_negative_numbers = true)]
    eps_sigma: Option<f64>,

    /// Root seed for simulation and bootstrap [default: drawn and reported]
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Refit bootstrap resamples on a worker pool
    #[arg(long)]
    parallel: bool,

    /// Refit on the calling thread, overriding a params file
    #[arg(long, conflicts_with = "parallel")]
    sequential: bool,

    /// Worker count for --parallel [default: 1]
    #[arg(long, alias = "n-jobs", allow_negative_numbers = true)]
    workers: Option<i64>,

    /// JSON file with run parameters; flags override its values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Bootstrap this CSV dataset (x,y) instead of simulating
    #[arg(long)]
    data: Option<PathBuf>,

    /// Write the JSON report to this path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the dataset as CSV to this path
    #[arg(long)]
    save_data: Option<PathBuf>,

    /// Save data and report to a timestamped directory under --artifacts-root
    #[arg(long)]
    log: bool,

    /// Root directory for --log
    #[arg(long, default_value = DEFAULT_ROOT)]
    artifacts_root: PathBuf,

    /// Print a human-readable summary to stderr
    #[arg(long)]
    summary: bool,

    /// Logging verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("input validation error: {0}")]
    Invalid(ols_bootstrap::Error),

    #[error("{0}")]
    Estimation(ols_bootstrap::Error),

    #[error("{0}")]
    Output(#[from] OutputError),
}

impl From<ols_bootstrap::Error> for CliError {
    fn from(e: ols_bootstrap::Error) -> Self {
        if e.is_validation() {
            CliError::Invalid(e)
        } else {
            CliError::Estimation(e)
        }
    }
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Invalid(_) => ExitCode::from(2),
            CliError::Output(e) if e.validation().is_some() => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

impl Args {
    fn raw_params(&self) -> RawParams {
        RawParams {
            n: self.n,
            b: self.b,
            intercept: self.intercept,
            slope: self.slope,
            x_sigma: self.x_sigma,
            eps_sigma: self.eps_sigma,
            seed: self.seed,
            parallel: match (self.parallel, self.sequential) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            workers: self.workers,
        }
    }
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn execute(args: &Args) -> Result<(), CliError> {
    let file_params = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(OutputError::from)?;
            info!("Loaded parameters from {}", path.display());
            RawParams::from_json_str(&text)?
        }
        None => RawParams::default(),
    };
    let raw = file_params.overlay(args.raw_params());
    if args.data.is_some() && raw.has_model_params() {
        warn!("Model parameters (intercept, slope, x_sigma, eps_sigma) are ignored with --data");
    }

    let supplied = match &args.data {
        Some(path) => {
            let data = csv::read_dataset(path)?;
            info!("Loaded {} rows from {}", data.len(), path.display());
            Some((data, path.clone()))
        }
        None => None,
    };

    let config = raw.into_config(supplied.as_ref().map(|(data, _)| data))?;
    if config.seed_drawn {
        info!(seed = config.seed, "No seed supplied; drew a fresh one");
    }

    let outcome = match supplied {
        Some((data, path)) => run_on(&config, data, DataSource::File { path })?,
        None => run(&config)?,
    };

    if let Some(path) = &args.save_data {
        csv::write_dataset(&outcome.data, path)?;
        info!("Saved data to {}", path.display());
    }

    if args.log {
        let dir = ArtifactDir::create(&args.artifacts_root, unix_millis()).map_err(OutputError::from)?;
        info!("Logging enabled: saving to {}", dir.path().display());
        dir.save(&outcome)?;
        info!("Wrote {} and {}", dir.data_path().display(), dir.report_path().display());
    }

    if let Some(path) = &args.out {
        json::write_report(&outcome.report, path)?;
        info!("Wrote results to {}", path.display());
    }

    if args.out.is_none() && !args.log {
        let text = json::to_json_pretty(&outcome.report).map_err(OutputError::from)?;
        println!("{text}");
    }

    if args.summary {
        eprint!("{}", terminal::format_report(&outcome.report));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}
