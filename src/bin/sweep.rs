//! CLI for running a sorting speedup sweep.
//!
//! Usage:
//!   sort-bench --preset fast                 # Run a built-in preset
//!   sort-bench --config sweep.toml           # Run a sweep described in TOML
//!   sort-bench --algorithms quickSort --sizes 5,6,7 --reps 3
//!   sort-bench --list                        # List presets

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use sort_speedup_bench::prelude::*;
use sort_speedup_bench::{run_pipeline, tui};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sort-bench", version, about = "Benchmark serial vs parallel sorting programs")]
struct CliArgs {
    /// List built-in presets and exit
    #[arg(short, long)]
    list: bool,

    /// Start from a built-in preset (see --list)
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// Sweep description in TOML
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated program names
    #[arg(short, long, value_delimiter = ',')]
    algorithms: Vec<String>,

    /// Comma-separated size exponents (input size = 2^n)
    #[arg(short, long, value_delimiter = ',')]
    sizes: Vec<u32>,

    /// Repetitions per (algorithm, size) pair
    #[arg(short, long = "reps")]
    repetitions: Option<usize>,

    /// Directory holding the sorting executables
    #[arg(long, value_name = "DIR")]
    bin_dir: Option<PathBuf>,

    /// Directory receiving tables and charts
    #[arg(long, value_name = "DIR")]
    reports_dir: Option<PathBuf>,

    /// Kill a trial after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Require labeled "time:" / "parallel time:" lines instead of positional numbers
    #[arg(long)]
    labeled: bool,
}

impl CliArgs {
    /// Defaults, then preset or file, then explicit flags.
    fn into_config(self, registry: &PresetRegistry) -> anyhow::Result<SweepConfig> {
        let mut config = match (&self.preset, &self.config) {
            (Some(name), _) => match registry.find(name) {
                Some(preset) => preset.to_config(),
                None => bail!(
                    "preset '{}' not found, available: {:?}",
                    name,
                    registry.list_names()
                ),
            },
            (None, Some(path)) => SweepConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            (None, None) => SweepConfig::default(),
        };

        if !self.algorithms.is_empty() {
            config.algorithms = self.algorithms.into_iter().map(AlgorithmId::new).collect();
        }
        if !self.sizes.is_empty() {
            config.size_exponents = self.sizes.into_iter().map(SizeExponent).collect();
        }
        if let Some(reps) = self.repetitions {
            config.repetitions = reps;
        }
        if let Some(dir) = self.bin_dir {
            config.bin_dir = dir;
        }
        if let Some(dir) = self.reports_dir {
            config.reports_dir = dir;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        if self.labeled {
            config.extract = ExtractMode::labeled();
        }

        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let registry = build_registry();
    if args.list {
        tui::print_available_presets(&registry);
        return Ok(());
    }

    let config = args.into_config(&registry)?;
    config.validate().context("invalid sweep configuration")?;

    tui::print_header();
    tui::print_sweep_box(&config);

    let mut runner = ProcessRunner::from_config(&config);
    let outcome = run_pipeline(&config, &mut runner, &SvgRenderer::default())
        .context("sweep aborted, no reports written")?;

    for report in &outcome.reports {
        tui::print_report_table(report);
    }
    tui::print_artifacts(&outcome.artifacts);

    println!("Note: Speedup is serial mean time divided by parallel mean time.");
    Ok(())
}
