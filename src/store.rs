//! Append-only accumulation of trial results for one sweep.

use std::collections::{BTreeMap, HashMap};

use crate::config::SweepConfig;
use crate::types::{AlgorithmId, SizeExponent, TrialResult};

/// Ordered results for every (algorithm, size) pair seen so far.
///
/// Results are only ever appended; insertion order is repetition order.
#[derive(Debug, Default)]
pub struct SampleStore {
    samples: HashMap<AlgorithmId, BTreeMap<SizeExponent, Vec<TrialResult>>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one result to the sequence for this key.
    pub fn append(&mut self, algorithm: &AlgorithmId, size: SizeExponent, result: TrialResult) {
        self.samples
            .entry(algorithm.clone())
            .or_default()
            .entry(size)
            .or_default()
            .push(result);
    }

    /// All results for this key in repetition order (empty if none).
    pub fn all_results_for(&self, algorithm: &AlgorithmId, size: SizeExponent) -> &[TrialResult] {
        self.samples
            .get(algorithm)
            .and_then(|sizes| sizes.get(&size))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of keys with at least one result.
    pub fn len(&self) -> usize {
        self.samples.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total number of stored results across all keys.
    pub fn total_results(&self) -> usize {
        self.samples
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// True when every configured point holds exactly `repetitions` results.
    pub fn is_complete(&self, config: &SweepConfig) -> bool {
        self.len() == config.algorithms.len() * config.size_exponents.len()
            && config
                .points()
                .all(|(a, s)| self.all_results_for(a, s).len() == config.repetitions)
    }
}
