//! Report emitter: tables and charts built from a finished sweep.
//!
//! Nothing here launches programs or mutates the sample store.

pub mod chart;
pub mod speedup;
pub mod table;

pub use chart::{write_chart, ChartRenderer, ChartSpec, SvgRenderer};
pub use speedup::{read_speedup_table, speedup_file_name, write_speedup_table, SpeedupTable};
pub use table::{write_samples_table, write_summary_table};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::SweepConfig;
use crate::error::{BenchError, Result};
use crate::stats::Report;
use crate::store::SampleStore;

/// Files produced for one sweep.
#[derive(Clone, Debug, Default)]
pub struct Artifacts {
    pub samples: PathBuf,
    pub summary: PathBuf,
    pub speedup: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Write every artifact of a completed sweep under `config.reports_dir`.
///
/// Files are staged in a scratch directory and moved into place only once all
/// of them were written, so a failure leaves `reports_dir` as it was.
pub fn write_reports(
    store: &SampleStore,
    config: &SweepConfig,
    reports: &[Report],
    renderer: &dyn ChartRenderer,
) -> Result<Artifacts> {
    if !store.is_complete(config) {
        return Err(BenchError::config(
            "sample store does not hold a complete sweep, refusing to write reports",
        ));
    }

    let dir = &config.reports_dir;
    let created = !dir.exists();
    fs::create_dir_all(dir)?;
    let staging = dir.join(format!(".staging-{}", std::process::id()));

    let written = fs::create_dir_all(&staging)
        .map_err(BenchError::from)
        .and_then(|()| write_artifacts(store, config, reports, renderer, &staging))
        .and_then(|staged| publish(staged, dir));

    let _ = fs::remove_dir_all(&staging);
    if written.is_err() && created {
        let _ = fs::remove_dir(dir);
    }
    let artifacts = written?;

    info!(dir = %dir.display(), charts = artifacts.charts.len(), "reports written");
    Ok(artifacts)
}

fn write_artifacts(
    store: &SampleStore,
    config: &SweepConfig,
    reports: &[Report],
    renderer: &dyn ChartRenderer,
    dir: &Path,
) -> Result<Artifacts> {
    let samples = dir.join("samples.csv");
    write_samples_table(store, config, &samples)?;

    let summary = dir.join("summary.csv");
    write_summary_table(reports, &summary)?;

    let speedup = dir.join(speedup_file_name(reports));
    write_speedup_table(reports, &speedup)?;

    let charts = reports
        .iter()
        .map(|report| write_chart(report, renderer, dir))
        .collect::<Result<Vec<_>>>()?;

    Ok(Artifacts {
        samples,
        summary,
        speedup,
        charts,
    })
}

/// Move staged files into `dir`, keeping their names.
fn publish(staged: Artifacts, dir: &Path) -> Result<Artifacts> {
    let move_into = |from: PathBuf| -> Result<PathBuf> {
        let to = dir.join(from.file_name().unwrap_or_default());
        fs::rename(&from, &to)?;
        Ok(to)
    };

    Ok(Artifacts {
        samples: move_into(staged.samples)?,
        summary: move_into(staged.summary)?,
        speedup: move_into(staged.speedup)?,
        charts: staged
            .charts
            .into_iter()
            .map(&move_into)
            .collect::<Result<Vec<_>>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_reports;
    use crate::types::TrialResult;
    use std::io;

    struct BrokenRenderer;

    impl ChartRenderer for BrokenRenderer {
        fn extension(&self) -> &'static str {
            "png"
        }

        fn render(&self, _chart: &ChartSpec, _out: &mut dyn io::Write) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "no raster backend"))
        }
    }

    fn config_in(root: &Path) -> SweepConfig {
        let mut config = SweepConfig::new(["mergeSort", "heapSort"], [5, 6], 3);
        config.reports_dir = root.join("reports");
        config
    }

    fn fill(config: &SweepConfig, store: &mut SampleStore, per_point: usize) {
        for (algo, size) in config.points() {
            for i in 0..per_point {
                store.append(algo, size, TrialResult::new(10.0 + i as f64, 4.0));
            }
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_incomplete_store_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let mut store = SampleStore::new();
        fill(&config, &mut store, config.repetitions);
        let reports = build_reports(&store, &config).unwrap();

        // one repetition short of a full sweep
        let mut short = SampleStore::new();
        fill(&config, &mut short, config.repetitions - 1);

        let err = write_reports(&short, &config, &reports, &SvgRenderer::default()).unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
        assert!(!config.reports_dir.exists());
    }

    #[test]
    fn test_complete_sweep_writes_all_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let mut store = SampleStore::new();
        fill(&config, &mut store, config.repetitions);
        let reports = build_reports(&store, &config).unwrap();

        let artifacts = write_reports(&store, &config, &reports, &SvgRenderer::default()).unwrap();
        assert_eq!(artifacts.charts.len(), 2);
        assert_eq!(artifacts.samples, config.reports_dir.join("samples.csv"));
        assert!(artifacts.speedup.exists());
        assert_eq!(
            entries(&config.reports_dir),
            vec![
                "heapSort_time.svg",
                "mergeSort_time.svg",
                "samples.csv",
                "speedup_mergeSort_heapSort.csv",
                "summary.csv",
            ]
        );
    }

    #[test]
    fn test_failed_chart_leaves_no_tables_behind() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        let mut store = SampleStore::new();
        fill(&config, &mut store, config.repetitions);
        let reports = build_reports(&store, &config).unwrap();

        assert!(write_reports(&store, &config, &reports, &BrokenRenderer).is_err());
        assert!(!config.reports_dir.exists());
    }

    #[test]
    fn test_failed_chart_keeps_existing_reports_dir_untouched() {
        let root = tempfile::tempdir().unwrap();
        let config = config_in(root.path());
        fs::create_dir_all(&config.reports_dir).unwrap();
        fs::write(config.reports_dir.join("notes.txt"), "previous run").unwrap();
        let mut store = SampleStore::new();
        fill(&config, &mut store, config.repetitions);
        let reports = build_reports(&store, &config).unwrap();

        assert!(write_reports(&store, &config, &reports, &BrokenRenderer).is_err());
        assert_eq!(entries(&config.reports_dir), vec!["notes.txt"]);
    }
}
