//! Error taxonomy for validation, estimation and bootstrap failures.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Distinguishable failure categories.
///
/// Every [`Error`] maps to exactly one kind, so callers can branch on the
/// category without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong runtime type (e.g. a boolean where an integer is expected).
    Type,
    /// Numeric value outside its required bound.
    Range,
    /// Malformed data: wrong dimensionality, column count or too few rows.
    Shape,
    /// NaN or infinity where finite values are required.
    NonFinite,
    /// Degenerate design matrix; no unique OLS solution exists.
    SingularDesign,
}

/// Errors raised by the validation layer and the estimation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A value had the wrong type.
    #[error("{name} must be {expected}, got {found}")]
    Type {
        /// Parameter name.
        name: String,
        /// Expected type description.
        expected: &'static str,
        /// Description of what was received.
        found: String,
    },

    /// A numeric value violated a bound.
    #[error("{name} must be {constraint}, got {value}")]
    Range {
        /// Parameter name.
        name: String,
        /// Violated constraint, e.g. `>= 2`.
        constraint: String,
        /// Offending value, formatted.
        value: String,
    },

    /// Data was structurally malformed.
    #[error("{name}: {message}")]
    Shape {
        /// Parameter name.
        name: String,
        /// What was wrong with the structure.
        message: String,
    },

    /// Data contained NaN or infinite values.
    #[error("{name} contains NaN or infinite values ({detail})")]
    NonFinite {
        /// Parameter name.
        name: String,
        /// Location or value of the first offending entry.
        detail: String,
    },

    /// The design matrix X^T X could not be inverted.
    #[error("singular design matrix: {reason}")]
    SingularDesign {
        /// Why the design is degenerate.
        reason: String,
    },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type { .. } => ErrorKind::Type,
            Error::Range { .. } => ErrorKind::Range,
            Error::Shape { .. } => ErrorKind::Shape,
            Error::NonFinite { .. } => ErrorKind::NonFinite,
            Error::SingularDesign { .. } => ErrorKind::SingularDesign,
        }
    }

    /// Whether this error came from input validation rather than estimation.
    pub fn is_validation(&self) -> bool {
        !matches!(self.kind(), ErrorKind::SingularDesign)
    }

    pub(crate) fn range(name: &str, constraint: impl Into<String>, value: impl ToString) -> Self {
        Error::Range {
            name: name.to_string(),
            constraint: constraint.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn shape(name: &str, message: impl Into<String>) -> Self {
        Error::Shape {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(name: &str, expected: &'static str, found: impl Into<String>) -> Self {
        Error::Type {
            name: name.to_string(),
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn non_finite(name: &str, detail: impl Into<String>) -> Self {
        Error::NonFinite {
            name: name.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn singular(reason: impl Into<String>) -> Self {
        Error::SingularDesign {
            reason: reason.into(),
        }
    }
}
