//! Running mean and variance.

use crate::error::{Error, Result};

/// Online mean/variance accumulator using Welford's algorithm.
///
/// Accumulates in a single pass without storing the values. M2 is the sum
/// of squared deviations from the running mean, converted to the unbiased
/// variance via M2/(n-1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    n: usize,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with one value.
    ///
    /// ```text
    /// δ = x - μₙ₋₁
    /// μₙ = μₙ₋₁ + δ/n
    /// M2ₙ = M2ₙ₋₁ + δ·(x - μₙ)
    /// ```
    pub fn update(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Number of values accumulated.
    pub fn count(&self) -> usize {
        self.n
    }

    /// Mean of the values, or `None` if empty.
    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean)
    }

    /// Bessel-corrected sample variance, or `None` for fewer than 2 values.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.n >= 2).then(|| (self.m2 / (self.n - 1) as f64).max(0.0))
    }

    /// Bessel-corrected sample standard deviation.
    pub fn sample_std(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

impl FromIterator<f64> for RunningMoments {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.update(x);
        }
        acc
    }
}

/// Sample standard deviation (divisor n-1) of `values`.
///
/// # Errors
///
/// `Shape` if fewer than two values are given.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    values
        .iter()
        .copied()
        .collect::<RunningMoments>()
        .sample_std()
        .ok_or_else(|| {
            Error::shape(
                "values",
                format!("must have at least 2 elements, got {}", values.len()),
            )
        })
}
