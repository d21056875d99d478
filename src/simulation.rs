//! Synthetic data from a linear model with Gaussian noise.
//!
//! y_i = intercept + slope * x_i + eps_i, with
//! x_i ~ N(0, x_sigma^2) and eps_i ~ N(0, eps_sigma^2).
//!
//! All N x draws come first from the seeded stream, then all N noise draws,
//! so a given seed always produces the same dataset.

use nalgebra::MatrixXx2;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Dataset;
use crate::validation;

/// Parameters of the generating model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Number of observations N (at least 2).
    pub n: usize,
    /// True intercept beta_0 (default: 1.0).
    pub intercept: f64,
    /// True slope beta_1 (default: 2.0).
    pub slope: f64,
    /// Standard deviation of x (default: 1.0).
    pub x_sigma: f64,
    /// Standard deviation of the noise (default: 1.0).
    pub eps_sigma: f64,
}

impl SimulationParams {
    /// Default model with `n` observations.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            intercept: 1.0,
            slope: 2.0,
            x_sigma: 1.0,
            eps_sigma: 1.0,
        }
    }

    /// Set the true intercept.
    pub fn intercept(mut self, intercept: f64) -> Self {
        self.intercept = intercept;
        self
    }

    /// Set the true slope.
    pub fn slope(mut self, slope: f64) -> Self {
        self.slope = slope;
        self
    }

    /// Set the standard deviation of x.
    pub fn x_sigma(mut self, x_sigma: f64) -> Self {
        self.x_sigma = x_sigma;
        self
    }

    /// Set the standard deviation of the noise.
    pub fn eps_sigma(mut self, eps_sigma: f64) -> Self {
        self.eps_sigma = eps_sigma;
        self
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// `Range` for N < 2 or a non-positive sigma, `NonFinite` for NaN or
    /// infinite values.
    pub fn validate(&self) -> Result<()> {
        validation::at_least("N", self.n, Dataset::MIN_ROWS)?;
        validation::real("intercept", self.intercept)?;
        validation::real("slope", self.slope)?;
        validation::positive("x_sigma", self.x_sigma)?;
        validation::positive("eps_sigma", self.eps_sigma)?;
        Ok(())
    }
}

fn normal(name: &str, sigma: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, sigma).map_err(|_| Error::range(name, "a valid standard deviation", sigma))
}

/// Simulate N (x, y) pairs from the linear model.
///
/// # Errors
///
/// Validation errors from [`SimulationParams::validate`], or `NonFinite` if
/// the parameters are so large that y overflows.
pub fn simulate(params: &SimulationParams, seed: u64) -> Result<Dataset> {
    params.validate()?;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let x_dist = normal("x_sigma", params.x_sigma)?;
    let eps_dist = normal("eps_sigma", params.eps_sigma)?;

    let n = params.n;
    let xs: Vec<f64> = x_dist.sample_iter(&mut rng).take(n).collect();
    let eps: Vec<f64> = eps_dist.sample_iter(&mut rng).take(n).collect();

    let data = MatrixXx2::from_fn(n, |i, j| match j {
        0 => xs[i],
        _ => params.intercept + params.slope * xs[i] + eps[i],
    });
    Dataset::from_matrix(data)
}
