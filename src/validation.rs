//! Input validation.
//!
//! Every value that enters the crate from outside (CLI flags, parameter
//! files, CSV datasets) passes through these functions before use. Each
//! validator takes the parameter name for error messages and returns the
//! value in its canonical type.

use rand::Rng;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::DataMatrix;

/// Upper bound (exclusive) for freshly drawn seeds.
pub const MAX_DRAWN_SEED: u64 = (1 << 31) - 1;

/// Validate an integer against optional inclusive bounds.
pub fn int(name: &str, value: i64, min: Option<i64>, max: Option<i64>) -> Result<i64> {
    if let Some(min) = min {
        if value < min {
            return Err(Error::range(name, format!(">= {min}"), value));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(Error::range(name, format!("<= {max}"), value));
        }
    }
    Ok(value)
}

/// Validate a count (N, B, worker count) and coerce it to `usize`.
pub fn count(name: &str, value: i64, min: usize) -> Result<usize> {
    let value = int(name, value, Some(min as i64), None)?;
    usize::try_from(value).map_err(|_| Error::range(name, "representable as usize", value))
}

/// Validate an already-unsigned count against a lower bound.
pub fn at_least(name: &str, value: usize, min: usize) -> Result<usize> {
    if value < min {
        return Err(Error::range(name, format!(">= {min}"), value));
    }
    Ok(value)
}

/// Validate that a real number is finite.
pub fn real(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::non_finite(name, format!("got {value}")));
    }
    Ok(value)
}

/// Validate that a real number is finite and strictly positive.
pub fn positive(name: &str, value: f64) -> Result<f64> {
    let value = real(name, value)?;
    if value <= 0.0 {
        return Err(Error::range(name, "> 0", value));
    }
    Ok(value)
}

/// Validate a user-supplied seed.
pub fn seed(value: i64) -> Result<u64> {
    let value = int("seed", value, Some(0), None)?;
    Ok(value as u64)
}

/// Validate a supplied seed, or draw a fresh one from OS entropy.
///
/// The returned seed is the one the run must use and report.
pub fn resolve_seed(value: Option<i64>) -> Result<u64> {
    match value {
        Some(v) => seed(v),
        None => Ok(rand::rng().random_range(0..MAX_DRAWN_SEED)),
    }
}

/// Validate that two columns have the same length.
pub fn same_length(name: &str, x_len: usize, y_len: usize) -> Result<()> {
    if x_len != y_len {
        return Err(Error::shape(
            name,
            format!("x and y must have the same length, got {x_len} and {y_len}"),
        ));
    }
    Ok(())
}

/// Validate an N x 2 data matrix: at least `min_rows` rows, all finite.
pub fn xy_matrix(name: &str, data: &DataMatrix, min_rows: usize) -> Result<()> {
    if data.nrows() < min_rows {
        return Err(Error::shape(
            name,
            format!("must have at least {min_rows} rows, got {}", data.nrows()),
        ));
    }
    for (i, row) in data.row_iter().enumerate() {
        if let Some(v) = row.iter().find(|v| !v.is_finite()) {
            return Err(Error::non_finite(name, format!("row {i} has value {v}")));
        }
    }
    Ok(())
}

/// Validate one textual (x, y) record and parse it.
///
/// The record must have exactly two fields, both real numbers, both finite.
pub fn xy_row(name: &str, fields: &[&str]) -> Result<[f64; 2]> {
    let [x, y] = fields else {
        return Err(Error::shape(
            name,
            format!("must have exactly 2 columns (x, y), got {}", fields.len()),
        ));
    };
    let x = parse_real("x", x)?;
    let y = parse_real("y", y)?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(Error::non_finite(name, format!("row ({x}, {y})")));
    }
    Ok([x, y])
}

/// Parse a textual field as a real number.
pub fn parse_real(name: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| Error::type_mismatch(name, "a real number", format!("{trimmed:?}")))
}

/// Describe a JSON value for error messages.
fn describe(value: &Value) -> String {
    let ty = match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{ty}: {value}")
}

/// Validate an untyped JSON value as an integer.
///
/// Booleans and floats are rejected with a type error even when they would
/// convert losslessly.
pub fn int_value(name: &str, value: &Value, min: Option<i64>, max: Option<i64>) -> Result<i64> {
    match value {
        Value::Number(n) if !n.is_f64() => match n.as_i64() {
            Some(v) => int(name, v, min, max),
            None => Err(Error::range(name, format!("<= {}", i64::MAX), n)),
        },
        other => Err(Error::type_mismatch(name, "an integer", describe(other))),
    }
}

/// Validate an untyped JSON value as a finite real number.
pub fn real_value(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => real(name, v),
            None => Err(Error::type_mismatch(name, "a real number", describe(value))),
        },
        other => Err(Error::type_mismatch(name, "a real number", describe(other))),
    }
}

/// Validate an untyped JSON value as a boolean.
pub fn bool_value(name: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(Error::type_mismatch(name, "a bool", describe(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_int_bounds() {
        assert_eq!(int("n", 5, Some(2), Some(10)).unwrap(), 5);
        assert_eq!(int("n", 1, Some(2), None).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(int("n", 11, None, Some(10)).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_count_rejects_negative() {
        assert_eq!(count("b", 300, 2).unwrap(), 300);
        let err = count("b", -3, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(err.to_string().contains("b must be >= 2"));
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive("x_sigma", 0.5).unwrap(), 0.5);
        assert_eq!(positive("x_sigma", 0.0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(positive("x_sigma", -1.0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(positive("x_sigma", f64::NAN).unwrap_err().kind(), ErrorKind::NonFinite);
        assert_eq!(
            positive("x_sigma", f64::INFINITY).unwrap_err().kind(),
            ErrorKind::NonFinite
        );
    }

    #[test]
    fn test_seed() {
        assert_eq!(seed(17).unwrap(), 17);
        assert_eq!(seed(0).unwrap(), 0);
        assert_eq!(seed(-1).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_resolve_seed_draws_in_range() {
        assert_eq!(resolve_seed(Some(42)).unwrap(), 42);
        for _ in 0..100 {
            let drawn = resolve_seed(None).unwrap();
            assert!(drawn < MAX_DRAWN_SEED);
        }
    }

    #[test]
    fn test_xy_row() {
        assert_eq!(xy_row("data", &["1.5", " -2"]).unwrap(), [1.5, -2.0]);

        let err = xy_row("data", &["1", "2", "3"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("got 3"));
        assert_eq!(xy_row("data", &["1"]).unwrap_err().kind(), ErrorKind::Shape);

        assert_eq!(xy_row("data", &["1", "abc"]).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(xy_row("data", &["NaN", "1"]).unwrap_err().kind(), ErrorKind::NonFinite);
        assert_eq!(xy_row("data", &["1", "-inf"]).unwrap_err().kind(), ErrorKind::NonFinite);
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("x", " 1.25 ").unwrap(), 1.25);
        assert_eq!(parse_real("x", "abc").unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn test_int_value_rejects_bool_and_float() {
        assert_eq!(int_value("n", &json!(10), Some(2), None).unwrap(), 10);
        assert_eq!(
            int_value("n", &json!(true), None, None).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            int_value("n", &json!(2.0), None, None).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            int_value("n", &json!("10"), None, None).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            int_value("seed", &json!(-5), Some(0), None).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_real_value() {
        assert_eq!(real_value("slope", &json!(2)).unwrap(), 2.0);
        assert_eq!(real_value("slope", &json!(-0.5)).unwrap(), -0.5);
        assert_eq!(
            real_value("slope", &json!(false)).unwrap_err().kind(),
            ErrorKind::Type
        );
    }

    #[test]
    fn test_bool_value() {
        assert!(bool_value("parallel", &json!(true)).unwrap());
        assert_eq!(
            bool_value("parallel", &json!(1)).unwrap_err().kind(),
            ErrorKind::Type
        );
    }
}
