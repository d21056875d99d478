//! Bootstrap standard error of the OLS slope.
//!
//! The pipeline is: draw B resamples from one seeded stream (always on the
//! calling thread), refit OLS on each resample sequentially or on a worker
//! pool, then reduce the B slopes to their Bessel-corrected standard
//! deviation. Refits are pure and results are gathered in resample order,
//! so both execution modes produce bit-identical statistics.
//!
//! A refit that hits a singular design fails the whole run; replicates are
//! never silently dropped.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::statistics::{fit, resample, ResampleBatch, RunningMoments};
use crate::thread_pool::WorkerPool;
use crate::types::Dataset;
use crate::validation;

/// Minimum number of replicates for a standard deviation.
pub const MIN_REPLICATES: usize = 2;

/// How the B refits are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Execution {
    /// Refit on the calling thread.
    #[default]
    Sequential,
    /// Refit on a pool of `workers` threads.
    Parallel {
        /// Pool size, at least 1.
        workers: usize,
    },
}

impl Execution {
    /// Build from a parallel flag and worker count.
    pub fn from_flags(parallel: bool, workers: usize) -> Self {
        if parallel {
            Self::Parallel { workers }
        } else {
            Self::Sequential
        }
    }

    /// Whether parallel execution was requested.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::Parallel { .. })
    }

    /// Worker count (1 for sequential).
    pub fn workers(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel { workers } => *workers,
        }
    }

    /// Check that a parallel request has at least one worker.
    pub fn validate(&self) -> Result<()> {
        if let Self::Parallel { workers } = self {
            validation::at_least("workers", *workers, 1)?;
        }
        Ok(())
    }
}

/// Result of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapEstimate {
    /// Standard deviation of the bootstrap slopes (the standard error).
    pub std_error: f64,
    /// Number of replicates B.
    pub replicates: usize,
    /// Mean of the bootstrap slopes.
    pub slope_mean: f64,
    /// Seed the resample batch was drawn from.
    pub seed: u64,
}

/// Estimate the standard error of the OLS slope by bootstrap.
///
/// # Arguments
///
/// * `data` - Source dataset
/// * `b` - Number of resamples, at least 2
/// * `seed` - Seed for the resample stream
/// * `execution` - Sequential or worker-pool refitting
///
/// # Errors
///
/// `Range` if `b < 2` or a parallel request has zero workers;
/// `SingularDesign` if any resample has constant x.
pub fn bootstrap_se(
    data: &Dataset,
    b: usize,
    seed: u64,
    execution: Execution,
) -> Result<BootstrapEstimate> {
    validation::at_least("B", b, MIN_REPLICATES)?;
    let slopes = bootstrap_slopes(data, b, seed, execution)?;

    let moments: RunningMoments = slopes.iter().copied().collect();
    let std_error = moments
        .sample_std()
        .ok_or_else(|| Error::shape("slopes", "fewer than 2 bootstrap slopes"))?;

    Ok(BootstrapEstimate {
        std_error,
        replicates: moments.count(),
        slope_mean: moments.mean().unwrap_or(f64::NAN),
        seed,
    })
}

/// Bootstrap slopes in resample order.
///
/// # Errors
///
/// `Range` if `b < 1` or a parallel request has zero workers;
/// `SingularDesign` if any resample has constant x.
pub fn bootstrap_slopes(
    data: &Dataset,
    b: usize,
    seed: u64,
    execution: Execution,
) -> Result<Vec<f64>> {
    execution.validate()?;
    let batch = resample(data, b, seed)?;
    refit_slopes(&batch, execution)
}

/// Refit OLS on every resample of `batch` and collect the slopes in order.
///
/// When several replicates are degenerate, the error reports the first one
/// in resample order regardless of execution mode.
pub fn refit_slopes(batch: &ResampleBatch, execution: Execution) -> Result<Vec<f64>> {
    execution.validate()?;

    let fits = match execution {
        Execution::Sequential => batch.samples().iter().map(fit).collect::<Vec<_>>(),
        Execution::Parallel { workers } => WorkerPool::new(workers).map_ordered(batch.samples(), fit),
    };

    fits.into_iter()
        .enumerate()
        .map(|(i, outcome)| {
            outcome.map(|beta| beta.slope).map_err(|err| match err {
                Error::SingularDesign { reason } => Error::singular(format!(
                    "bootstrap replicate {i} of {} (seed {}): {reason}",
                    batch.len(),
                    batch.seed()
                )),
                other => other,
            })
        })
        .collect()
}
