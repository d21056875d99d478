//! CSV files for (x, y) datasets.
//!
//! Format: optional `x,y` header, then one `x,y` pair per line. Values are
//! written with Rust's shortest round-trip formatting, so reading a written
//! file reproduces the dataset bit for bit.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::artifacts::ensure_parent_dir;
use super::OutputError;
use crate::error::Error;
use crate::types::Dataset;
use crate::validation;

/// Header line written before the data rows.
pub const HEADER: &str = "x,y";

/// Write `data` to any writer as CSV.
pub fn write_dataset_to<W: Write>(data: &Dataset, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for [x, y] in data.rows() {
        writeln!(writer, "{x},{y}")?;
    }
    writer.flush()
}

/// Write `data` to `path`, creating parent directories.
pub fn write_dataset(data: &Dataset, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    write_dataset_to(data, BufWriter::new(file))?;
    Ok(())
}

/// Parse a dataset from CSV text.
///
/// Blank lines are skipped and a leading non-numeric header is ignored.
///
/// # Errors
///
/// `OutputError::Data` wrapping `Shape` for rows without exactly two fields
/// or fewer than two rows, `Type` for unparsable fields, `NonFinite` for
/// NaN or infinite values.
pub fn parse_dataset<R: BufRead>(reader: R) -> Result<Dataset, OutputError> {
    let mut rows: Vec<[f64; 2]> = Vec::new();
    let mut first_content_line = true;

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if first_content_line {
            first_content_line = false;
            if is_header(&parts) {
                continue;
            }
        }

        let row = validation::xy_row("data", &parts).map_err(|e| at_line(line_num, e))?;
        rows.push(row);
    }

    Dataset::from_rows(&rows).map_err(|source| OutputError::Data { line: 0, source })
}

/// Read a dataset from a CSV file.
pub fn read_dataset(path: &Path) -> Result<Dataset, OutputError> {
    let file = File::open(path)?;
    parse_dataset(BufReader::new(file))
}

fn is_header(parts: &[&str]) -> bool {
    parts
        .iter()
        .all(|p| p.trim().parse::<f64>().is_err() && !p.trim().is_empty())
}

fn at_line(line: usize, source: Error) -> OutputError {
    OutputError::Data { line, source }
}
