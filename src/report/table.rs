//! CSV export of raw samples and per-point summaries.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::SweepConfig;
use crate::error::Result;
use crate::stats::Report;
use crate::store::SampleStore;

/// Write every stored sample, one row per repetition.
pub fn write_samples_table(store: &SampleStore, config: &SweepConfig, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "algorithm,size_exponent,elements,repetition,serial_ms,parallel_ms")?;

    for (algorithm, size) in config.points() {
        let elements = size.elements(config.max_argument)?;
        for (i, result) in store.all_results_for(algorithm, size).iter().enumerate() {
            writeln!(
                file,
                "{},{},{},{},{},{}",
                algorithm,
                size,
                elements,
                i + 1,
                result.serial_ms,
                result.parallel_ms
            )?;
        }
    }

    file.flush()?;
    Ok(())
}

/// Write mean, standard deviation, 95% half-width and speedup per point.
pub fn write_summary_table(reports: &[Report], path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(
        file,
        "algorithm,size_exponent,samples,\
         serial_mean_ms,serial_std_ms,serial_ci_ms,\
         parallel_mean_ms,parallel_std_ms,parallel_ci_ms,speedup"
    )?;

    for report in reports {
        for (size, stat) in &report.rows {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{}",
                report.algorithm,
                size,
                stat.samples,
                stat.serial.mean,
                stat.serial.std_dev,
                stat.serial.ci_half_width,
                stat.parallel.mean,
                stat.parallel.std_dev,
                stat.parallel.ci_half_width,
                stat.speedup
            )?;
        }
    }

    file.flush()?;
    Ok(())
}
