//! Error types for the sweep harness.
//!
//! Every variant is fatal: a sweep that hits one is aborted and no report is
//! written for it.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while configuring, running or reporting a sweep.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("failed to launch {}: {source}", path.display())]
    LaunchFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}: {stderr}", path.display())]
    NonZeroExit {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("{} did not finish within {timeout:?}", path.display())]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("could not parse timings: {message} (output: {output:?})")]
    ParseFailure { message: String, output: String },

    #[error("parallel mean is zero, speedup undefined")]
    DivisionByZero,

    #[error("trial {repetition} of {algorithm} with 2^{size_exponent} elements failed: {source}")]
    Trial {
        algorithm: String,
        size_exponent: u32,
        repetition: usize,
        #[source]
        source: Box<BenchError>,
    },

    #[error("summarizing {algorithm} with 2^{size_exponent} elements failed: {source}")]
    Summary {
        algorithm: String,
        size_exponent: u32,
        #[source]
        source: Box<BenchError>,
    },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    pub fn config(message: impl Into<String>) -> Self {
        BenchError::Configuration {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>, output: &str) -> Self {
        BenchError::ParseFailure {
            message: message.into(),
            output: output.to_string(),
        }
    }

    /// Strip the per-trial or per-point context, if any.
    pub fn root(&self) -> &BenchError {
        match self {
            BenchError::Trial { source, .. } | BenchError::Summary { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BenchError>;
