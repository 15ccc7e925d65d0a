//! The sweep pipeline: run every trial in order, then summarize and report.
//!
//! Trials run strictly one after another in algorithm → size → repetition
//! order. The first failure aborts the sweep; nothing partial is reported.

use tracing::{debug, info, warn};

use crate::config::SweepConfig;
use crate::error::{BenchError, Result};
use crate::report::{write_reports, Artifacts, ChartRenderer};
use crate::stats::{build_reports, Report};
use crate::store::SampleStore;
use crate::trial::TrialRunner;

/// Everything a finished sweep produced.
#[derive(Debug)]
pub struct SweepOutcome {
    pub store: SampleStore,
    pub reports: Vec<Report>,
    pub artifacts: Artifacts,
}

/// Run all trials of the sweep and collect their results.
pub fn run_sweep<R: TrialRunner + ?Sized>(
    config: &SweepConfig,
    runner: &mut R,
) -> Result<SampleStore> {
    config.validate()?;

    let total = config.total_trials();
    let mut store = SampleStore::new();
    let mut done = 0;

    for (algorithm, size) in config.points() {
        info!(algorithm = %algorithm, size_exponent = size.0, "measuring");

        for repetition in 1..=config.repetitions {
            info!(
                "Iteration {} with 2**{} elements of {}... ({}/{})",
                repetition,
                size,
                algorithm,
                done + 1,
                total
            );

            let result = runner
                .run_trial(algorithm, size)
                .and_then(|output| {
                    debug!(output = %output.trim_end(), "trial output");
                    config.extract.extract(&output)
                })
                .map_err(|e| {
                    warn!(
                        algorithm = %algorithm,
                        size_exponent = size.0,
                        repetition,
                        error = %e,
                        "aborting sweep"
                    );
                    BenchError::Trial {
                        algorithm: algorithm.to_string(),
                        size_exponent: size.0,
                        repetition,
                        source: Box::new(e),
                    }
                })?;

            debug!(serial_ms = result.serial_ms, parallel_ms = result.parallel_ms, "trial parsed");
            store.append(algorithm, size, result);
            done += 1;
        }
    }

    Ok(store)
}

/// Sweep, summarize, and write every report artifact.
pub fn run_pipeline<R: TrialRunner + ?Sized>(
    config: &SweepConfig,
    runner: &mut R,
    renderer: &dyn ChartRenderer,
) -> Result<SweepOutcome> {
    let store = run_sweep(config, runner)?;
    let reports = build_reports(&store, config)?;
    let artifacts = write_reports(&store, config, &reports, renderer)?;
    Ok(SweepOutcome {
        store,
        reports,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractMode;
    use crate::report::{read_speedup_table, SvgRenderer};
    use crate::types::{AlgorithmId, SizeExponent};
    use std::collections::VecDeque;

    /// Replays canned outputs and records every call.
    struct ScriptedRunner {
        outputs: VecDeque<Result<String>>,
        calls: Vec<(String, u32)>,
    }

    impl ScriptedRunner {
        fn new(outputs: Vec<Result<String>>) -> Self {
            Self {
                outputs: outputs.into(),
                calls: Vec::new(),
            }
        }

        fn repeating(output: &str, n: usize) -> Self {
            Self::new((0..n).map(|_| Ok(output.to_string())).collect())
        }
    }

    impl TrialRunner for ScriptedRunner {
        fn run_trial(&mut self, algorithm: &AlgorithmId, size: SizeExponent) -> Result<String> {
            self.calls.push((algorithm.to_string(), size.0));
            self.outputs
                .pop_front()
                .unwrap_or_else(|| Err(BenchError::config("script exhausted")))
        }
    }

    #[test]
    fn test_empty_algorithms_launch_nothing() {
        let cfg = SweepConfig::new(Vec::<&str>::new(), [5], 3);
        let mut runner = ScriptedRunner::repeating("1 1", 10);
        let err = run_sweep(&cfg, &mut runner).unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_nested_order() {
        let cfg = SweepConfig::new(["a", "b"], [1, 2], 2);
        let mut runner = ScriptedRunner::repeating("3 1", cfg.total_trials());
        let store = run_sweep(&cfg, &mut runner).unwrap();

        let expected: Vec<(String, u32)> = [
            ("a", 1),
            ("a", 1),
            ("a", 2),
            ("a", 2),
            ("b", 1),
            ("b", 1),
            ("b", 2),
            ("b", 2),
        ]
        .into_iter()
        .map(|(a, s)| (a.to_string(), s))
        .collect();
        assert_eq!(runner.calls, expected);
        assert!(store.is_complete(&cfg));
    }

    #[test]
    fn test_five_pair_fixture_through_pipeline() {
        let cfg = SweepConfig::new(["mergeSort"], [12], 5);
        let outputs = [(10, 5), (20, 10), (30, 15), (40, 20), (50, 25)]
            .into_iter()
            .map(|(s, p)| {
                Ok(format!(
                    "Merge Sort time: {} ms\nMerge Sort Parallel time: {} ms\n",
                    s, p
                ))
            })
            .collect();
        let mut runner = ScriptedRunner::new(outputs);
        let store = run_sweep(&cfg, &mut runner).unwrap();
        let reports = build_reports(&store, &cfg).unwrap();

        let (_, stat) = reports[0].rows[0];
        assert!((stat.serial.mean - 30.0).abs() < 1e-9);
        assert!((stat.parallel.mean - 15.0).abs() < 1e-9);
        assert!((stat.speedup - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_failure_aborts_with_context() {
        let cfg = SweepConfig::new(["quickSort"], [5, 6], 2);
        let mut runner = ScriptedRunner::new(vec![
            Ok("4 2".into()),
            Ok("4 2".into()),
            Ok("4 2".into()),
            Ok("only 4".into()),
            Ok("4 2".into()),
        ]);
        let err = run_sweep(&cfg, &mut runner).unwrap_err();
        match &err {
            BenchError::Trial {
                algorithm,
                size_exponent,
                repetition,
                ..
            } => {
                assert_eq!(algorithm, "quickSort");
                assert_eq!(*size_exponent, 6);
                assert_eq!(*repetition, 2);
            }
            other => panic!("expected Trial error, got {:?}", other),
        }
        assert!(matches!(err.root(), BenchError::ParseFailure { .. }));
        assert_eq!(runner.calls.len(), 4);
    }

    #[test]
    fn test_runner_failure_aborts_immediately() {
        let cfg = SweepConfig::new(["a"], [1], 3);
        let mut runner = ScriptedRunner::new(vec![
            Err(BenchError::NonZeroExit {
                path: "a".into(),
                status: "exit status: 1".into(),
                stderr: String::new(),
            }),
            Ok("1 1".into()),
        ]);
        let err = run_sweep(&cfg, &mut runner).unwrap_err();
        assert!(matches!(err.root(), BenchError::NonZeroExit { .. }));
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn test_labeled_mode_used() {
        let mut cfg = SweepConfig::new(["a"], [1], 1);
        cfg.extract = ExtractMode::labeled();
        let mut runner = ScriptedRunner::repeating("seed 42\nparallel time: 2\ntime: 8\n", 1);
        let store = run_sweep(&cfg, &mut runner).unwrap();
        let r = store.all_results_for(&"a".into(), SizeExponent(1))[0];
        assert_eq!((r.serial_ms, r.parallel_ms), (8.0, 2.0));
    }

    #[test]
    fn test_pipeline_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = SweepConfig::new(["mergeSort", "heapSort"], [12, 14], 2);
        cfg.reports_dir = dir.path().join("reports");
        let mut runner =
            ScriptedRunner::repeating("time: 12 ms\nParallel time: 4 ms\n", cfg.total_trials());

        let outcome = run_pipeline(&cfg, &mut runner, &SvgRenderer::default()).unwrap();
        assert_eq!(outcome.reports.len(), 2);
        assert_eq!(outcome.artifacts.charts.len(), 2);
        assert!(outcome.artifacts.samples.exists());
        assert!(outcome.artifacts.summary.exists());
        assert!(cfg.reports_dir.join("mergeSort_time.svg").exists());
        assert!(outcome.artifacts.speedup.ends_with("speedup_mergeSort_heapSort.csv"));

        let table = read_speedup_table(&outcome.artifacts.speedup).unwrap();
        assert!((table.get("heapSort", SizeExponent(14)).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_parallel_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = SweepConfig::new(["a"], [1], 1);
        cfg.reports_dir = dir.path().join("reports");
        let mut runner = ScriptedRunner::repeating("5 0", 1);

        let err = run_pipeline(&cfg, &mut runner, &SvgRenderer::default()).unwrap_err();
        assert!(matches!(err.root(), BenchError::DivisionByZero));
        assert!(!cfg.reports_dir.exists());
    }
}
