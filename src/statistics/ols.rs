//! Ordinary least squares for a single predictor.
//!
//! The model is: y = beta_0 * ones + beta_1 * x + epsilon
//!
//! Solved in closed form from the normal equations (X^T X) beta = X^T y.
//! x is centred on its mean first, so X = [ones | x - mean(x)] and X^T X
//! stays well conditioned even when x carries a large offset. X^T X is
//! symmetric positive definite whenever x is not constant, so a Cholesky
//! factorization gives the solve. The intercept is shifted back to the
//! uncentred x afterwards.

use nalgebra::{Cholesky, DVector};

use crate::error::{Error, Result};
use crate::types::{Beta, Coefficients, Dataset, DesignMatrix, Gram};

/// Spread of x, relative to its mean, below which x carries no usable
/// variance once rounding is accounted for.
const PIVOT_TOLERANCE: f64 = 64.0 * f64::EPSILON;

/// Fit intercept and slope by OLS.
///
/// # Errors
///
/// `SingularDesign` if all x values are identical, or if their spread is
/// within rounding of their mean so that X^T X is numerically singular.
pub fn fit(data: &Dataset) -> Result<Coefficients> {
    solve_normal_equations(data.x(), data.y()).map(Coefficients::from)
}

/// Fit from separate x and y columns, validating them first.
///
/// # Errors
///
/// `Shape` if the columns differ in length or hold fewer than two values,
/// `NonFinite` for NaN or infinite entries, `SingularDesign` as for [`fit`].
pub fn fit_xy(x: &[f64], y: &[f64]) -> Result<Coefficients> {
    let data = Dataset::from_columns(x, y)?;
    fit(&data)
}

/// Build the N x 2 design matrix [ones | x].
pub fn build_design_matrix(x: &[f64]) -> DesignMatrix {
    DesignMatrix::from_fn(x.len(), |i, j| if j == 0 { 1.0 } else { x[i] })
}

fn solve_normal_equations(x: &[f64], y: &[f64]) -> Result<Beta> {
    let first = x[0];
    if x.iter().all(|&v| v == first) {
        return Err(Error::singular(format!(
            "all {} x values equal {first}",
            x.len()
        )));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let centred: Vec<f64> = x.iter().map(|v| v - x_mean).collect();

    let design = build_design_matrix(&centred);
    let response = DVector::from_column_slice(y);

    let gram: Gram = design.tr_mul(&design);
    let xty = design.tr_mul(&response);

    let chol = Cholesky::new(gram)
        .ok_or_else(|| Error::singular("X^T X is not positive definite"))?;

    // l11^2 is the centred sum of squares of x. Differences below the
    // rounding error of the mean are noise, not spread.
    let l = chol.l();
    let pivot_sq = l[(1, 1)] * l[(1, 1)];
    let floor = n * (PIVOT_TOLERANCE * x_mean).powi(2);
    if pivot_sq <= floor {
        return Err(Error::singular(format!(
            "x variance {pivot_sq:e} is below rounding level {floor:e} of mean(x) = {x_mean:e}"
        )));
    }

    let centred_beta = chol.solve(&xty);
    let slope = centred_beta[1];
    let beta = Beta::new(centred_beta[0] - slope * x_mean, slope);
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(Error::singular("normal equations produced non-finite coefficients"));
    }
    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_noiseless_recovery() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();

        let beta = fit_xy(&x, &y).unwrap();
        assert!((beta.intercept - 1.0).abs() < 1e-12, "intercept {}", beta.intercept);
        assert!((beta.slope - 2.0).abs() < 1e-12, "slope {}", beta.slope);
    }

    #[test]
    fn test_negative_slope_and_offset_x() {
        let x: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 0.5).collect();
        let y: Vec<f64> = x.iter().map(|v| -3.0 - 0.25 * v).collect();

        let beta = fit_xy(&x, &y).unwrap();
        assert!((beta.intercept + 3.0).abs() < 1e-8);
        assert!((beta.slope + 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_two_points_define_line() {
        let beta = fit_xy(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert!((beta.intercept - 0.0).abs() < 1e-12);
        assert!((beta.slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_centered_formula() {
        let x = [0.3, -1.2, 2.5, 0.9, -0.4, 1.7];
        let y = [1.1, -0.8, 6.2, 2.4, 0.5, 4.4];

        let n = x.len() as f64;
        let mx = x.iter().sum::<f64>() / n;
        let my = y.iter().sum::<f64>() / n;
        let sxy: f64 = x.iter().zip(&y).map(|(a, b)| (a - mx) * (b - my)).sum();
        let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
        let slope = sxy / sxx;
        let intercept = my - slope * mx;

        let beta = fit_xy(&x, &y).unwrap();
        assert!((beta.slope - slope).abs() < 1e-12);
        assert!((beta.intercept - intercept).abs() < 1e-12);
    }

    #[test]
    fn test_constant_x_is_singular() {
        let err = fit_xy(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularDesign);
    }

    #[test]
    fn test_x_variance_below_rounding_is_singular() {
        let base = 1.0e8;
        let x = [base, base + 1e-8, base];
        let err = fit_xy(&x, &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularDesign);
    }

    #[test]
    fn test_large_offset_x_is_fittable() {
        let x: Vec<f64> = (0..20).map(|i| 1.0e8 + i as f64).collect();
        let y: Vec<f64> = (0..20).map(|i| 3.0 + 0.5 * i as f64).collect();

        let beta = fit_xy(&x, &y).unwrap();
        assert!((beta.slope - 0.5).abs() < 1e-9, "slope {}", beta.slope);
        let at_first = beta.intercept + beta.slope * x[0];
        assert!((at_first - 3.0).abs() < 1e-6, "fitted value {at_first}");
    }

    #[test]
    fn test_single_row_is_shape_error() {
        let err = fit_xy(&[1.0], &[2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_design_matrix_layout() {
        let x = build_design_matrix(&[4.0, 5.0]);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(1, 0)], 1.0);
        assert_eq!(x[(0, 1)], 4.0);
        assert_eq!(x[(1, 1)], 5.0);
    }
}
