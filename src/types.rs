//! Core value types shared by the sweep, the store and the reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BenchError, Result};

/// Name of one benchmarked sorting program (e.g., "mergeSort").
///
/// Doubles as the executable file name inside the configured binary directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with the first letter upper-cased, used for chart titles.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlgorithmId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Exponent n of a benchmarked input size; the program sorts 2^n elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeExponent(pub u32);

impl SizeExponent {
    /// Number of elements, 2^n, checked against `max_argument`.
    pub fn elements(self, max_argument: u64) -> Result<u64> {
        let value = 1u64
            .checked_shl(self.0)
            .ok_or_else(|| BenchError::config(format!("2^{} overflows a 64-bit integer", self.0)))?;
        if value > max_argument {
            return Err(BenchError::config(format!(
                "2^{} = {} exceeds the program's argument limit {}",
                self.0, value, max_argument
            )));
        }
        Ok(value)
    }
}

impl fmt::Display for SizeExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-reported timings of one external run, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialResult {
    pub serial_ms: f64,
    pub parallel_ms: f64,
}

impl TrialResult {
    pub fn new(serial_ms: f64, parallel_ms: f64) -> Self {
        Self {
            serial_ms,
            parallel_ms,
        }
    }
}
