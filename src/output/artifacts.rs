//! Timestamped artifact directories.
//!
//! A run saved with artifacts enabled gets its own directory
//! `<root>/run-<unix_ms>/` holding `data.csv` and `result.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{csv, json, OutputError};
use crate::pipeline::RunOutcome;

/// Default root for artifact directories.
pub const DEFAULT_ROOT: &str = "artifacts";

/// File name of the dataset inside a run directory.
pub const DATA_FILE: &str = "data.csv";

/// File name of the report inside a run directory.
pub const REPORT_FILE: &str = "result.json";

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// One run's artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDir {
    path: PathBuf,
}

impl ArtifactDir {
    /// Create `<root>/run-<timestamp_ms>/`.
    ///
    /// If that directory already exists (two runs in the same millisecond), a
    /// numeric suffix is appended until a fresh name is found.
    pub fn create(root: &Path, timestamp_ms: u64) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let base = format!("run-{timestamp_ms}");
        let mut path = root.join(&base);
        let mut suffix = 1;
        loop {
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    path = root.join(format!("{base}-{suffix}"));
                    suffix += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the dataset file.
    pub fn data_path(&self) -> PathBuf {
        self.path.join(DATA_FILE)
    }

    /// Path of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.path.join(REPORT_FILE)
    }

    /// Write the dataset and report of `outcome` into this directory.
    pub fn save(&self, outcome: &RunOutcome) -> Result<(), OutputError> {
        csv::write_dataset(&outcome.data, &self.data_path())?;
        json::write_report(&outcome.report, &self.report_path())
    }
}
