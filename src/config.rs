//! Sweep configuration: which programs, which sizes, how many repetitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BenchError, Result};
use crate::extract::ExtractMode;
use crate::types::{AlgorithmId, SizeExponent};

/// Default number of repetitions per (algorithm, size) pair.
pub const DEFAULT_REPETITIONS: usize = 10;

/// Largest size argument the sorting programs accept (`atoi` into `int`).
pub const DEFAULT_MAX_ARGUMENT: u64 = i32::MAX as u64;

/// Description of one sweep.
///
/// Loadable from TOML; every field has a default so a file may set only
/// what it needs and leave the rest to command-line flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Programs to benchmark, in run order
    pub algorithms: Vec<AlgorithmId>,
    /// Size exponents, in run order (input size = 2^n)
    pub size_exponents: Vec<SizeExponent>,
    /// Repetitions per (algorithm, size) pair (default: 10)
    pub repetitions: usize,
    /// Directory holding the sorting executables (default: ".")
    pub bin_dir: PathBuf,
    /// Directory receiving tables and charts (default: "reports")
    pub reports_dir: PathBuf,
    /// How timings are pulled out of program output (default: positional)
    pub extract: ExtractMode,
    /// Kill a trial that runs longer than this (default: wait forever)
    pub timeout_secs: Option<u64>,
    /// Upper bound for 2^n passed on the command line
    pub max_argument: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            algorithms: Vec::new(),
            size_exponents: Vec::new(),
            repetitions: DEFAULT_REPETITIONS,
            bin_dir: PathBuf::from("."),
            reports_dir: PathBuf::from("reports"),
            extract: ExtractMode::default(),
            timeout_secs: None,
            max_argument: DEFAULT_MAX_ARGUMENT,
        }
    }
}

impl SweepConfig {
    pub fn new<A, S>(algorithms: A, size_exponents: S, repetitions: usize) -> Self
    where
        A: IntoIterator,
        A::Item: Into<AlgorithmId>,
        S: IntoIterator<Item = u32>,
    {
        Self {
            algorithms: algorithms.into_iter().map(Into::into).collect(),
            size_exponents: size_exponents.into_iter().map(SizeExponent).collect(),
            repetitions,
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self> {
        toml::from_str(s).map_err(|source| BenchError::ConfigFile {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check the configuration before any trial runs.
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(BenchError::config("no algorithms configured"));
        }
        if self.size_exponents.is_empty() {
            return Err(BenchError::config("no size exponents configured"));
        }
        if self.repetitions < 1 {
            return Err(BenchError::config("repetition count must be at least 1"));
        }

        let mut seen = HashSet::new();
        for algo in &self.algorithms {
            if algo.as_str().trim().is_empty() {
                return Err(BenchError::config("blank algorithm name"));
            }
            // Names become file names and CSV header cells.
            if algo
                .as_str()
                .chars()
                .any(|c| matches!(c, ',' | '"' | '/' | '\\') || c.is_control())
            {
                return Err(BenchError::config(format!(
                    "algorithm name '{}' must be a plain file name",
                    algo
                )));
            }
            if !seen.insert(algo) {
                return Err(BenchError::config(format!("algorithm '{}' listed twice", algo)));
            }
        }

        let mut seen = HashSet::new();
        for &size in &self.size_exponents {
            if !seen.insert(size) {
                return Err(BenchError::config(format!("size exponent {} listed twice", size)));
            }
            size.elements(self.max_argument)?;
        }

        if self.timeout_secs == Some(0) {
            return Err(BenchError::config("timeout must be positive"));
        }

        self.extract.validate()
    }

    /// Enumerate (algorithm, size) pairs in run order: algorithm-major.
    pub fn points(&self) -> impl Iterator<Item = (&AlgorithmId, SizeExponent)> + '_ {
        self.algorithms
            .iter()
            .flat_map(move |a| self.size_exponents.iter().map(move |&s| (a, s)))
    }

    /// Total number of trials in the sweep.
    pub fn total_trials(&self) -> usize {
        self.algorithms.len() * self.size_exponents.len() * self.repetitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let cfg = SweepConfig::new(["mergeSort", "heapSort"], [12, 14], 3);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.total_trials(), 12);
    }

    #[test]
    fn test_empty_sets_rejected() {
        let no_algos = SweepConfig::new(Vec::<&str>::new(), [12], 3);
        assert!(matches!(no_algos.validate(), Err(BenchError::Configuration { .. })));

        let no_sizes = SweepConfig::new(["quickSort"], Vec::<u32>::new(), 3);
        assert!(matches!(no_sizes.validate(), Err(BenchError::Configuration { .. })));

        let no_reps = SweepConfig::new(["quickSort"], [5], 0);
        assert!(matches!(no_reps.validate(), Err(BenchError::Configuration { .. })));
    }

    #[test]
    fn test_duplicates_and_overflow_rejected() {
        assert!(SweepConfig::new(["a", "a"], [5], 1).validate().is_err());
        assert!(SweepConfig::new(["a"], [5, 5], 1).validate().is_err());
        assert!(SweepConfig::new(["a"], [31], 1).validate().is_err());
        assert!(SweepConfig::new(["a"], [30], 1).validate().is_ok());
        assert!(SweepConfig::new(["a,b"], [5], 1).validate().is_err());
        assert!(SweepConfig::new(["../a"], [5], 1).validate().is_err());
    }

    #[test]
    fn test_points_are_algorithm_major() {
        let cfg = SweepConfig::new(["a", "b"], [1, 2], 1);
        let points: Vec<_> = cfg.points().map(|(a, s)| (a.as_str().to_string(), s.0)).collect();
        assert_eq!(
            points,
            vec![
                ("a".to_string(), 1),
                ("a".to_string(), 2),
                ("b".to_string(), 1),
                ("b".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let text = r#"
            algorithms = ["mergeSort", "bitonicSort"]
            size_exponents = [12, 14]
            timeout_secs = 60

            [extract]
            mode = "labeled"
        "#;
        let cfg = SweepConfig::from_toml_str(text, Path::new("sweep.toml")).unwrap();
        assert_eq!(cfg.algorithms.len(), 2);
        assert_eq!(cfg.repetitions, DEFAULT_REPETITIONS);
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(60)));
        assert!(matches!(cfg.extract, ExtractMode::Labeled { .. }));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_toml_unknown_field() {
        let err = SweepConfig::from_toml_str("iterations = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, BenchError::ConfigFile { .. }));
    }
}
