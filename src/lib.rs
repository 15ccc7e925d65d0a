//! # Sort-Speedup-Bench
//!
//! Drives external sorting programs that time their own serial and parallel
//! runs, repeats each measurement, and reports mean time, 95% confidence
//! bands and parallel speedup per algorithm and input size.

pub mod config;
pub mod error;
pub mod extract;
pub mod registry;
pub mod report;
pub mod stats;
pub mod store;
pub mod sweep;
pub mod trial;
pub mod tui;
pub mod types;

pub use error::{BenchError, Result};
pub use sweep::{run_pipeline, run_sweep};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::SweepConfig;
    pub use crate::extract::ExtractMode;
    pub use crate::registry::{build_registry, Preset, PresetRegistry};
    pub use crate::report::{ChartRenderer, SvgRenderer};
    pub use crate::stats::{summarize, Report, SummaryStat};
    pub use crate::store::SampleStore;
    pub use crate::trial::{ProcessRunner, TrialRunner};
    pub use crate::types::{AlgorithmId, SizeExponent, TrialResult};
}
