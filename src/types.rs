//! Type aliases and common types.

use nalgebra::{Dyn, Matrix2, MatrixXx2, OMatrix, Vector2, U2};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation;

/// N x 2 matrix of (x, y) rows.
pub type DataMatrix = MatrixXx2<f64>;

/// N x 2 design matrix [ones | x].
pub type DesignMatrix = OMatrix<f64, Dyn, U2>;

/// 2x2 normal-equations matrix X^T X.
pub type Gram = Matrix2<f64>;

/// 2-vector of (intercept, slope).
pub type Beta = Vector2<f64>;

/// Ordered collection of N finite (x, y) pairs, N >= 2.
///
/// A `Dataset` can only be obtained through a validating constructor, the
/// simulator, or the resampler, so every instance upholds the invariants.
/// It is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: DataMatrix,
}

impl Dataset {
    /// Minimum number of rows a dataset must have.
    pub const MIN_ROWS: usize = 2;

    /// Build a dataset from row pairs.
    ///
    /// # Errors
    ///
    /// `Shape` if there are fewer than two rows, `NonFinite` if any entry is
    /// NaN or infinite.
    pub fn from_rows(rows: &[[f64; 2]]) -> Result<Self> {
        let data = DataMatrix::from_fn(rows.len(), |i, j| rows[i][j]);
        Self::from_matrix(data)
    }

    /// Build a dataset from separate x and y columns.
    ///
    /// # Errors
    ///
    /// `Shape` if the columns differ in length or hold fewer than two values,
    /// `NonFinite` if any entry is NaN or infinite.
    pub fn from_columns(x: &[f64], y: &[f64]) -> Result<Self> {
        validation::same_length("data", x.len(), y.len())?;
        let data = DataMatrix::from_fn(x.len(), |i, j| if j == 0 { x[i] } else { y[i] });
        Self::from_matrix(data)
    }

    /// Build a dataset from an N x 2 matrix.
    pub fn from_matrix(data: DataMatrix) -> Result<Self> {
        validation::xy_matrix("data", &data, Self::MIN_ROWS)?;
        Ok(Self { data })
    }

    /// Wrap a matrix whose invariants the caller already guarantees.
    pub(crate) fn from_matrix_unchecked(data: DataMatrix) -> Self {
        debug_assert!(data.nrows() >= Self::MIN_ROWS);
        Self { data }
    }

    /// Number of rows N.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false; a dataset has at least two rows.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// The i-th (x, y) pair.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn row(&self, i: usize) -> [f64; 2] {
        [self.data[(i, 0)], self.data[(i, 1)]]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = [f64; 2]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// The x column.
    pub fn x(&self) -> &[f64] {
        // Owned storage is column-major: all x values, then all y values.
        &self.data.as_slice()[..self.len()]
    }

    /// The y column.
    pub fn y(&self) -> &[f64] {
        &self.data.as_slice()[self.len()..]
    }

    /// Underlying N x 2 matrix.
    pub fn as_matrix(&self) -> &DataMatrix {
        &self.data
    }

    /// Materialize the rows at `indices`, in the given order.
    pub(crate) fn select_rows(&self, indices: &[usize]) -> Self {
        Self::from_matrix_unchecked(self.data.select_rows(indices))
    }
}

/// OLS coefficient vector (intercept, slope).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Intercept beta_0.
    pub intercept: f64,
    /// Slope beta_1.
    pub slope: f64,
}

impl Coefficients {
    /// Coefficients as `[intercept, slope]`.
    pub fn to_array(self) -> [f64; 2] {
        [self.intercept, self.slope]
    }
}

impl From<Beta> for Coefficients {
    fn from(beta: Beta) -> Self {
        Self {
            intercept: beta[0],
            slope: beta[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_rows_preserves_order() {
        let ds = Dataset::from_rows(&[[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]]).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.row(1), [1.0, 3.0]);
        assert_eq!(ds.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(ds.y(), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_single_row_is_shape_error() {
        let err = Dataset::from_rows(&[[0.0, 1.0]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_mismatched_columns_is_shape_error() {
        let err = Dataset::from_columns(&[0.0, 1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_nan_is_non_finite_error() {
        let err = Dataset::from_rows(&[[0.0, 1.0], [f64::NAN, 2.0]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonFinite);

        let err = Dataset::from_columns(&[0.0, 1.0], &[1.0, f64::INFINITY]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonFinite);
    }

    #[test]
    fn test_select_rows_in_drawn_order() {
        let ds = Dataset::from_rows(&[[0.0, 10.0], [1.0, 11.0], [2.0, 12.0]]).unwrap();
        let picked = ds.select_rows(&[2, 2, 0]);
        let rows: Vec<[f64; 2]> = picked.rows().collect();
        assert_eq!(rows, vec![[2.0, 12.0], [2.0, 12.0], [0.0, 10.0]]);
    }

    #[test]
    fn test_coefficients_from_beta() {
        let c = Coefficients::from(Beta::new(1.5, -2.0));
        assert_eq!(c.to_array(), [1.5, -2.0]);
    }
}
