//! Run configuration.
//!
//! Parameters arrive untyped ([`RawParams`], from CLI flags or a JSON
//! parameter file) and become a [`RunConfig`] only after passing the
//! validation layer. A `RunConfig` always carries a concrete root seed: if
//! none was supplied, one is drawn and recorded so the run stays
//! reproducible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bootstrap::{Execution, MIN_REPLICATES};
use crate::error::{Error, Result};
use crate::simulation::SimulationParams;
use crate::statistics::counter_rng_seed;
use crate::types::Dataset;
use crate::validation;

/// Keys accepted in a JSON parameter file.
pub const PARAM_KEYS: [&str; 9] = [
    "n",
    "b",
    "intercept",
    "slope",
    "x_sigma",
    "eps_sigma",
    "seed",
    "parallel",
    "workers",
];

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Generating model (N is the dataset size when data is supplied).
    pub simulation: SimulationParams,

    /// Number of bootstrap resamples B (at least 2).
    pub replicates: usize,

    /// Root seed for all randomness in the run.
    pub seed: u64,

    /// Whether `seed` was drawn rather than supplied.
    pub seed_drawn: bool,

    /// Sequential or parallel refitting.
    pub execution: Execution,
}

impl RunConfig {
    /// Configuration with default model parameters and a fixed seed.
    pub fn new(n: usize, replicates: usize, seed: u64) -> Self {
        Self {
            simulation: SimulationParams::new(n),
            replicates,
            seed,
            seed_drawn: false,
            execution: Execution::Sequential,
        }
    }

    /// Set the generating model.
    pub fn simulation(mut self, simulation: SimulationParams) -> Self {
        self.simulation = simulation;
        self
    }

    /// Refit on a pool of `workers` threads.
    pub fn parallel(mut self, workers: usize) -> Self {
        self.execution = Execution::Parallel { workers };
        self
    }

    /// Refit on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.execution = Execution::Sequential;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.validate_bootstrap()
    }

    /// Check the fields a run on supplied data uses: B and the execution mode.
    pub fn validate_bootstrap(&self) -> Result<()> {
        validation::at_least("N", self.simulation.n, Dataset::MIN_ROWS)?;
        validation::at_least("B", self.replicates, MIN_REPLICATES)?;
        self.execution.validate()
    }

    /// Independent seeds for the simulator and the resampler.
    pub fn streams(&self) -> SeedStreams {
        SeedStreams::from_root(self.seed)
    }
}

/// Per-component seeds derived from one root seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStreams {
    /// Seed for the data simulator.
    pub simulation: u64,
    /// Seed for the bootstrap resampler.
    pub bootstrap: u64,
}

impl SeedStreams {
    /// Split `root` into non-overlapping component streams.
    pub fn from_root(root: u64) -> Self {
        Self {
            simulation: counter_rng_seed(root, 0),
            bootstrap: counter_rng_seed(root, 1),
        }
    }
}

/// Unvalidated run parameters.
///
/// Integers are signed so that negative inputs reach validation and fail
/// with a range error instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    /// Number of observations N.
    pub n: Option<i64>,
    /// Number of bootstrap resamples B.
    pub b: Option<i64>,
    /// True intercept.
    pub intercept: Option<f64>,
    /// True slope.
    pub slope: Option<f64>,
    /// Standard deviation of x.
    pub x_sigma: Option<f64>,
    /// Standard deviation of the noise.
    pub eps_sigma: Option<f64>,
    /// Root seed.
    pub seed: Option<i64>,
    /// Parallel refitting.
    pub parallel: Option<bool>,
    /// Worker count.
    pub workers: Option<i64>,
}

impl RawParams {
    /// Parse a JSON parameter document.
    ///
    /// # Errors
    ///
    /// `Shape` for invalid JSON, a non-object document or unknown keys;
    /// `Type`/`Range` for individual fields.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::shape("params", format!("invalid JSON: {e}")))?;
        Self::from_json_value(&value)
    }

    /// Read parameters from an untyped JSON object.
    ///
    /// `"seed": null` means "draw a seed". Every other field must have its
    /// proper JSON type; booleans are never accepted as integers.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::shape("params", "parameter document must be a JSON object")
        })?;

        if let Some(key) = obj.keys().find(|k| !PARAM_KEYS.contains(&k.as_str())) {
            return Err(Error::shape(
                "params",
                format!("unknown key {key:?}, expected one of {PARAM_KEYS:?}"),
            ));
        }

        let int = |key: &str| -> Result<Option<i64>> {
            obj.get(key).map(|v| validation::int_value(key, v, None, None)).transpose()
        };
        let real = |key: &str| -> Result<Option<f64>> {
            obj.get(key).map(|v| validation::real_value(key, v)).transpose()
        };

        Ok(Self {
            n: int("n")?,
            b: int("b")?,
            intercept: real("intercept")?,
            slope: real("slope")?,
            x_sigma: real("x_sigma")?,
            eps_sigma: real("eps_sigma")?,
            seed: seed_field(obj)?,
            parallel: obj
                .get("parallel")
                .map(|v| validation::bool_value("parallel", v))
                .transpose()?,
            workers: int("workers")?,
        })
    }

    /// Fields set in `other` replace those in `self`.
    pub fn overlay(self, other: RawParams) -> RawParams {
        RawParams {
            n: other.n.or(self.n),
            b: other.b.or(self.b),
            intercept: other.intercept.or(self.intercept),
            slope: other.slope.or(self.slope),
            x_sigma: other.x_sigma.or(self.x_sigma),
            eps_sigma: other.eps_sigma.or(self.eps_sigma),
            seed: other.seed.or(self.seed),
            parallel: other.parallel.or(self.parallel),
            workers: other.workers.or(self.workers),
        }
    }

    /// Whether any generating-model parameter is set.
    pub fn has_model_params(&self) -> bool {
        self.intercept.is_some()
            || self.slope.is_some()
            || self.x_sigma.is_some()
            || self.eps_sigma.is_some()
    }

    /// Validate and resolve into a [`RunConfig`].
    ///
    /// `dataset` supplies N when the data is loaded rather than simulated;
    /// an explicit N must then match it. With a dataset the model
    /// parameters are ignored and not validated.
    pub fn into_config(self, dataset: Option<&Dataset>) -> Result<RunConfig> {
        let n = match (self.n, dataset) {
            (Some(n), Some(data)) => {
                let n = validation::count("N", n, Dataset::MIN_ROWS)?;
                if n != data.len() {
                    return Err(Error::shape(
                        "N",
                        format!("given as {n} but the dataset has {} rows", data.len()),
                    ));
                }
                n
            }
            (Some(n), None) => validation::count("N", n, Dataset::MIN_ROWS)?,
            (None, Some(data)) => data.len(),
            (None, None) => return Err(missing("N")),
        };
        let b = validation::count("B", self.b.ok_or_else(|| missing("B"))?, MIN_REPLICATES)?;
        let workers = validation::count("workers", self.workers.unwrap_or(1), 1)?;

        let defaults = SimulationParams::new(n);
        let simulation = if dataset.is_some() {
            // No model generates supplied data, so its parameters are not used.
            defaults
        } else {
            SimulationParams {
                n,
                intercept: validation::real(
                    "intercept",
                    self.intercept.unwrap_or(defaults.intercept),
                )?,
                slope: validation::real("slope", self.slope.unwrap_or(defaults.slope))?,
                x_sigma: validation::positive("x_sigma", self.x_sigma.unwrap_or(defaults.x_sigma))?,
                eps_sigma: validation::positive(
                    "eps_sigma",
                    self.eps_sigma.unwrap_or(defaults.eps_sigma),
                )?,
            }
        };

        let seed = validation::resolve_seed(self.seed)?;

        let config = RunConfig {
            simulation,
            replicates: b,
            seed,
            seed_drawn: self.seed.is_none(),
            execution: Execution::from_flags(self.parallel.unwrap_or(false), workers),
        };
        config.validate()?;
        Ok(config)
    }
}

fn seed_field(obj: &Map<String, Value>) -> Result<Option<i64>> {
    match obj.get("seed") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => validation::int_value("seed", v, Some(0), None).map(Some),
    }
}

fn missing(name: &str) -> Error {
    Error::type_mismatch(name, "an integer", "nothing (parameter is required)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn required() -> RawParams {
        RawParams {
            n: Some(50),
            b: Some(100),
            seed: Some(7),
            ..RawParams::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = required().into_config(None).unwrap();
        assert_eq!(config.simulation, SimulationParams::new(50));
        assert_eq!(config.replicates, 100);
        assert_eq!(config.seed, 7);
        assert!(!config.seed_drawn);
        assert_eq!(config.execution, Execution::Sequential);
    }

    #[test]
    fn test_missing_seed_is_drawn() {
        let raw = RawParams { seed: None, ..required() };
        let config = raw.into_config(None).unwrap();
        assert!(config.seed_drawn);
        assert!(config.seed < validation::MAX_DRAWN_SEED);
    }

    #[test]
    fn test_missing_required() {
        let raw = RawParams { b: None, ..required() };
        assert_eq!(raw.into_config(None).unwrap_err().kind(), ErrorKind::Type);

        let raw = RawParams { n: None, ..required() };
        assert_eq!(raw.into_config(None).unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn test_range_failures() {
        let cases = [
            RawParams { n: Some(1), ..required() },
            RawParams { b: Some(1), ..required() },
            RawParams { seed: Some(-1), ..required() },
            RawParams { workers: Some(0), ..required() },
            RawParams { x_sigma: Some(0.0), ..required() },
            RawParams { eps_sigma: Some(-2.0), ..required() },
        ];
        for raw in cases {
            let err = raw.clone().into_config(None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{raw:?}");
        }
    }

    #[test]
    fn test_n_taken_from_dataset() {
        let data = Dataset::from_rows(&[[0.0, 1.0], [1.0, 2.0], [2.0, 2.5]]).unwrap();
        let raw = RawParams { n: None, ..required() };
        let config = raw.into_config(Some(&data)).unwrap();
        assert_eq!(config.simulation.n, 3);

        let raw = RawParams { n: Some(4), ..required() };
        assert_eq!(raw.into_config(Some(&data)).unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_model_params_ignored_with_dataset() {
        let data = Dataset::from_rows(&[[0.0, 1.0], [1.0, 2.0], [2.0, 2.5]]).unwrap();
        let raw = RawParams {
            n: Some(3),
            x_sigma: Some(-1.0),
            slope: Some(7.0),
            ..required()
        };
        assert!(raw.has_model_params());
        assert_eq!(raw.clone().into_config(None).unwrap_err().kind(), ErrorKind::Range);

        let config = raw.into_config(Some(&data)).unwrap();
        assert_eq!(config.simulation, SimulationParams::new(3));
        assert!(!required().has_model_params());
    }

    #[test]
    fn test_parallel_flags() {
        let raw = RawParams {
            parallel: Some(true),
            workers: Some(4),
            ..required()
        };
        let config = raw.into_config(None).unwrap();
        assert_eq!(config.execution, Execution::Parallel { workers: 4 });
    }

    #[test]
    fn test_json_params() {
        let raw = RawParams::from_json_str(
            r#"{"n": 200, "b": 300, "slope": -1.5, "seed": null, "parallel": true, "workers": 2}"#,
        )
        .unwrap();
        assert_eq!(raw.n, Some(200));
        assert_eq!(raw.b, Some(300));
        assert_eq!(raw.slope, Some(-1.5));
        assert_eq!(raw.seed, None);
        assert_eq!(raw.parallel, Some(true));
        assert_eq!(raw.workers, Some(2));
    }

    #[test]
    fn test_json_bool_as_int_rejected() {
        let err = RawParams::from_json_str(r#"{"n": true, "b": 10}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().contains("n must be an integer"));
    }

    #[test]
    fn test_json_negative_seed_rejected() {
        let err = RawParams::from_json_str(r#"{"n": 10, "b": 10, "seed": -3}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_json_structure_errors() {
        let err = RawParams::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = RawParams::from_json_str(r#"{"n": 10, "beta0": 1}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = RawParams::from_json_str("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_overlay_prefers_other() {
        let base = RawParams {
            n: Some(10),
            slope: Some(3.0),
            ..RawParams::default()
        };
        let merged = base.overlay(RawParams {
            n: Some(20),
            ..RawParams::default()
        });
        assert_eq!(merged.n, Some(20));
        assert_eq!(merged.slope, Some(3.0));
    }

    #[test]
    fn test_seed_streams_distinct_and_stable() {
        let streams = SeedStreams::from_root(17);
        assert_ne!(streams.simulation, streams.bootstrap);
        assert_eq!(streams, RunConfig::new(10, 10, 17).streams());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new(30, 50, 1)
            .simulation(SimulationParams::new(30).slope(0.5))
            .parallel(3);
        assert!(config.validate().is_ok());
        assert_eq!(config.execution.workers(), 3);
        assert_eq!(config.clone().sequential().execution, Execution::Sequential);
    }
}
