//! Statistical core: OLS fitting, bootstrap resampling and moment reduction.
//!
//! - Closed-form OLS via the normal equations with a Cholesky solve
//! - Uniform with-replacement resampling from a single seeded stream
//! - Welford running moments for the Bessel-corrected standard deviation

mod moments;
mod ols;
mod resample;

pub use moments::{sample_std, RunningMoments};
pub use ols::{build_design_matrix, fit, fit_xy};
pub use resample::{counter_rng_seed, resample, resample_indices_into, ResampleBatch};
