//! JSON serialization for run reports.

use std::fs;
use std::path::Path;

use super::artifacts::ensure_parent_dir;
use super::OutputError;
use crate::result::RunReport;

/// Serialize a RunReport to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for RunReport).
pub fn to_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a RunReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for RunReport).
pub fn to_json_pretty(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Write a pretty-printed report to `path`, creating parent directories.
pub fn write_report(report: &RunReport, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    let mut text = to_json_pretty(report)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Read a report previously written with [`write_report`].
pub fn read_report(path: &Path) -> Result<RunReport, OutputError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
