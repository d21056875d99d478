//! End-to-end run: simulate (or accept) data, fit, bootstrap, report.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::bootstrap::bootstrap_se;
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::result::{BootstrapSummary, DataSource, RunInputs, RunMetadata, RunOutputs, RunReport};
use crate::simulation::simulate;
use crate::statistics::fit;
use crate::types::Dataset;

/// Dataset and report of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The dataset the estimates were computed on.
    pub data: Dataset,
    /// Serializable report.
    pub report: RunReport,
}

/// Simulate a dataset from `config` and run the bootstrap on it.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let start = Instant::now();
    config.validate()?;

    let streams = config.streams();
    let sim = &config.simulation;
    info!(
        n = sim.n,
        intercept = sim.intercept,
        slope = sim.slope,
        x_sigma = sim.x_sigma,
        eps_sigma = sim.eps_sigma,
        seed = config.seed,
        "simulating data"
    );
    let data = simulate(sim, streams.simulation)?;

    let source = DataSource::Simulated {
        stream_seed: streams.simulation,
    };
    estimate(config, data, source, start)
}

/// Run the bootstrap on a dataset supplied by the caller.
pub fn run_on(config: &RunConfig, data: Dataset, source: DataSource) -> Result<RunOutcome> {
    let start = Instant::now();
    config.validate_bootstrap()?;
    if config.simulation.n != data.len() {
        return Err(Error::shape(
            "N",
            format!("configured as {} but the dataset has {} rows", config.simulation.n, data.len()),
        ));
    }
    info!(n = data.len(), source = ?source, "using supplied data");
    estimate(config, data, source, start)
}

fn estimate(
    config: &RunConfig,
    data: Dataset,
    source: DataSource,
    start: Instant,
) -> Result<RunOutcome> {
    let beta_hat = fit(&data)?;
    info!(
        beta0_hat = beta_hat.intercept,
        beta1_hat = beta_hat.slope,
        "OLS estimates"
    );

    let streams = config.streams();
    info!(
        b = config.replicates,
        parallel = config.execution.is_parallel(),
        workers = config.execution.workers(),
        seed = config.seed,
        "bootstrapping"
    );
    let estimate = bootstrap_se(&data, config.replicates, streams.bootstrap, config.execution)?;
    info!(se = estimate.std_error, "bootstrap SE(beta1_hat)");
    debug!(slope_mean = estimate.slope_mean, stream_seed = estimate.seed, "bootstrap replicates");

    let report = RunReport {
        inputs: RunInputs::new(config, &source),
        outputs: RunOutputs {
            beta_hat: beta_hat.to_array(),
            se_boot_beta1: estimate.std_error,
            bootstrap: BootstrapSummary::from(&estimate),
        },
        meta: RunMetadata {
            timestamp_unix_ms: unix_millis(),
            runtime_ms: start.elapsed().as_millis() as u64,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            data_source: source,
        },
    };

    Ok(RunOutcome { data, report })
}

/// Milliseconds since the Unix epoch (0 if the clock is before it).
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
