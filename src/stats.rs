//! Reduction of sample sets to means, confidence intervals and speedup.

use crate::config::SweepConfig;
use crate::error::{BenchError, Result};
use crate::store::SampleStore;
use crate::types::{AlgorithmId, SizeExponent, TrialResult};

/// z-value for a two-sided 95% interval under the normal approximation.
pub const Z_95: f64 = 1.96;

/// Mean, spread and 95% half-width of one timing column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    /// Population standard deviation (divides by n, not n - 1)
    pub std_dev: f64,
    /// 1.96 * std_dev / sqrt(n)
    pub ci_half_width: f64,
}

impl ColumnStats {
    /// Statistics of a non-empty column.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(BenchError::config("cannot summarize an empty sample set"));
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = calculate_std_dev(values, mean);
        Ok(Self {
            mean,
            std_dev,
            ci_half_width: Z_95 * std_dev / n.sqrt(),
        })
    }

    pub fn lower(&self) -> f64 {
        self.mean - self.ci_half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.ci_half_width
    }
}

/// Population standard deviation around a known mean.
pub fn calculate_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Summary of one (algorithm, size) sample set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SummaryStat {
    pub serial: ColumnStats,
    pub parallel: ColumnStats,
    /// serial mean / parallel mean
    pub speedup: f64,
    pub samples: usize,
}

/// Reduce a sequence of trial results; fails on an empty input or a zero
/// parallel mean.
pub fn summarize(results: &[TrialResult]) -> Result<SummaryStat> {
    let serial: Vec<f64> = results.iter().map(|r| r.serial_ms).collect();
    let parallel: Vec<f64> = results.iter().map(|r| r.parallel_ms).collect();

    let serial = ColumnStats::from_values(&serial)?;
    let parallel = ColumnStats::from_values(&parallel)?;

    if parallel.mean == 0.0 {
        return Err(BenchError::DivisionByZero);
    }

    Ok(SummaryStat {
        serial,
        parallel,
        speedup: serial.mean / parallel.mean,
        samples: results.len(),
    })
}

/// All summary rows for one algorithm, in configured size order.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub algorithm: AlgorithmId,
    pub rows: Vec<(SizeExponent, SummaryStat)>,
}

impl Report {
    pub fn sizes(&self) -> impl Iterator<Item = SizeExponent> + '_ {
        self.rows.iter().map(|(s, _)| *s)
    }

    pub fn speedup_at(&self, size: SizeExponent) -> Option<f64> {
        self.rows
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, stat)| stat.speedup)
    }
}

/// Summarize every configured point; the store must hold a complete sweep.
pub fn build_reports(store: &SampleStore, config: &SweepConfig) -> Result<Vec<Report>> {
    config
        .algorithms
        .iter()
        .map(|algorithm| -> Result<Report> {
            let rows = config
                .size_exponents
                .iter()
                .map(|&size| -> Result<(SizeExponent, SummaryStat)> {
                    let stat = summarize(store.all_results_for(algorithm, size)).map_err(|e| {
                        BenchError::Summary {
                            algorithm: algorithm.to_string(),
                            size_exponent: size.0,
                            source: Box::new(e),
                        }
                    })?;
                    Ok((size, stat))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Report {
                algorithm: algorithm.clone(),
                rows,
            })
        })
        .collect()
}
