//! # ols-bootstrap
//!
//! Bootstrap standard errors for the slope of a simple linear regression.
//!
//! This crate simulates (x, y) data from a known linear model with Gaussian
//! noise, fits ordinary least squares, and resamples the data with
//! replacement to estimate the sampling variability of the slope:
//! - Data simulation from a seeded, reproducible stream
//! - Closed-form OLS via the normal equations
//! - Nonparametric bootstrap with sequential or worker-pool refitting
//! - Bessel-corrected standard deviation of the bootstrap slopes
//!
//! ## Quick Start
//!
//! ```
//! use ols_bootstrap::{bootstrap_se, fit, simulate, Execution, SimulationParams};
//!
//! let data = simulate(&SimulationParams::new(200), 17)?;
//! let beta = fit(&data)?;
//! let se = bootstrap_se(&data, 500, 17, Execution::Parallel { workers: 4 })?;
//!
//! println!("slope = {:.3} ± {:.3}", beta.slope, se.std_error);
//! # Ok::<(), ols_bootstrap::Error>(())
//! ```
//!
//! ## Reproducibility
//!
//! Every function that consumes randomness takes its seed explicitly; there
//! is no global generator. For whole runs, [`RunConfig`] holds one root seed
//! and [`SeedStreams`] splits it into separate simulation and bootstrap
//! streams. A run without a seed draws one and records it in the report.
//!
//! Sequential and parallel refitting give bit-identical results for the same
//! seed: resampling always happens on the calling thread, and refits are
//! gathered in resample order before the reduction.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod error;
mod types;
pub mod validation;

// Functional modules
pub mod bootstrap;
pub mod simulation;
pub mod statistics;
pub mod thread_pool;

// Run plumbing
pub mod config;
pub mod output;
pub mod pipeline;
pub mod result;

// Re-exports for public API
pub use bootstrap::{bootstrap_se, bootstrap_slopes, BootstrapEstimate, Execution};
pub use config::{RawParams, RunConfig, SeedStreams};
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{run, run_on, RunOutcome};
pub use result::{DataSource, RunReport};
pub use simulation::{simulate, SimulationParams};
pub use statistics::{fit, fit_xy, resample, ResampleBatch};
pub use types::{Beta, Coefficients, DataMatrix, Dataset, DesignMatrix, Gram};
