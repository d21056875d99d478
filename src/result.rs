//! Run report types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapEstimate;
use crate::config::RunConfig;

/// Complete result of one run: what went in, what came out, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Parameters the run used, including the resolved seed.
    pub inputs: RunInputs,
    /// Point estimate and bootstrap standard error.
    pub outputs: RunOutputs,
    /// Timing and provenance.
    pub meta: RunMetadata,
}

/// Parameters of a run.
///
/// The generating-model fields are `None` when the data was loaded rather
/// than simulated, since no model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    /// Number of observations N.
    pub n: usize,
    /// Number of bootstrap resamples B.
    pub b: usize,
    /// True intercept of the generating model.
    pub intercept: Option<f64>,
    /// True slope of the generating model.
    pub slope: Option<f64>,
    /// Standard deviation of x.
    pub x_sigma: Option<f64>,
    /// Standard deviation of the noise.
    pub eps_sigma: Option<f64>,
    /// Root seed.
    pub seed: u64,
    /// Whether the seed was drawn rather than supplied.
    pub seed_drawn: bool,
    /// Whether refits ran on a worker pool.
    pub parallel: bool,
    /// Worker count.
    pub workers: usize,
}

impl RunInputs {
    /// Inputs of a run on data from `source`.
    pub fn new(config: &RunConfig, source: &DataSource) -> Self {
        let sim = &config.simulation;
        let model = |value: f64| match source {
            DataSource::Simulated { .. } => Some(value),
            DataSource::File { .. } => None,
        };
        Self {
            n: sim.n,
            b: config.replicates,
            intercept: model(sim.intercept),
            slope: model(sim.slope),
            x_sigma: model(sim.x_sigma),
            eps_sigma: model(sim.eps_sigma),
            seed: config.seed,
            seed_drawn: config.seed_drawn,
            parallel: config.execution.is_parallel(),
            workers: config.execution.workers(),
        }
    }
}

/// Estimates produced by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutputs {
    /// OLS point estimate `[intercept, slope]` on the full dataset.
    pub beta_hat: [f64; 2],
    /// Bootstrap standard error of the slope.
    pub se_boot_beta1: f64,
    /// Bootstrap diagnostics.
    pub bootstrap: BootstrapSummary,
}

/// Bootstrap diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSummary {
    /// Number of replicates.
    pub replicates: usize,
    /// Mean of the bootstrap slopes.
    pub slope_mean: f64,
    /// Seed of the resample stream (derived from the root seed).
    pub stream_seed: u64,
}

impl From<&BootstrapEstimate> for BootstrapSummary {
    fn from(est: &BootstrapEstimate) -> Self {
        Self {
            replicates: est.replicates,
            slope_mean: est.slope_mean,
            stream_seed: est.seed,
        }
    }
}

/// Where the dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Simulated from the generating model.
    Simulated {
        /// Seed of the simulation stream (derived from the root seed).
        stream_seed: u64,
    },
    /// Loaded from a CSV file.
    File {
        /// Path the data was read from.
        path: PathBuf,
    },
}

/// Timing and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Wall-clock completion time, milliseconds since the Unix epoch.
    pub timestamp_unix_ms: u64,
    /// Wall-clock runtime in milliseconds.
    pub runtime_ms: u64,
    /// Version of this crate.
    pub crate_version: String,
    /// Origin of the dataset.
    pub data_source: DataSource,
}
