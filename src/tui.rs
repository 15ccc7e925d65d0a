//! Text User Interface (TUI) utilities.
//!
//! Handles formatted console output for the CLI.

use crate::config::SweepConfig;
use crate::registry::PresetRegistry;
use crate::report::Artifacts;
use crate::stats::Report;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " Sort Speedup Benchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!("║{}{}{}║", " ".repeat(padding), title, " ".repeat(right_padding));
    println!("╚{}╝", border);
    println!();
}

/// Print the sweep about to run
pub fn print_sweep_box(config: &SweepConfig) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let algos: Vec<&str> = config.algorithms.iter().map(|a| a.as_str()).collect();
    let sizes: Vec<String> = config.size_exponents.iter().map(|s| format!("2^{}", s)).collect();
    let lines = [
        format!("Algorithms:  {}", algos.join(", ")),
        format!("Sizes:       {}", sizes.join(", ")),
        format!("Repetitions: {} ({} trials)", config.repetitions, config.total_trials()),
        format!("Programs:    {}", config.bin_dir.display()),
    ];

    let content_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(60)
        .min(max_content_width);
    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    for line in &lines {
        println!("│ {:<width$} │", truncate(line, content_width), width = content_width);
    }
    println!("└{}┘", border);
    println!();
}

/// Print the summary table for one algorithm
pub fn print_report_table(report: &Report) {
    if report.rows.is_empty() {
        return;
    }

    let term_width = get_term_width();
    // 6 + 4 * 22 + 9 columns plus separators
    let table_width = (6 + 4 * 22 + 9 + 6).min(term_width.saturating_sub(2));

    println!("  {}", report.algorithm);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:>6} {:>21} {:>21} {:>21} {:>21} {:>9}",
        "n", "Serial mean (ms)", "± 95% CI", "Parallel mean (ms)", "± 95% CI", "Speedup"
    );
    println!("  {}", "─".repeat(table_width));

    for (size, stat) in &report.rows {
        println!(
            "  {:>6} {:>21.3} {:>21.3} {:>21.3} {:>21.3} {:>8.2}x",
            format!("2^{}", size),
            stat.serial.mean,
            stat.serial.ci_half_width,
            stat.parallel.mean,
            stat.parallel.ci_half_width,
            stat.speedup
        );
    }
    println!();
}

/// Print where the artifacts were written
pub fn print_artifacts(artifacts: &Artifacts) {
    println!("  Samples:  {}", artifacts.samples.display());
    println!("  Summary:  {}", artifacts.summary.display());
    println!("  Speedup:  {}", artifacts.speedup.display());
    for chart in &artifacts.charts {
        println!("  Chart:    {}", chart.display());
    }
    println!();
}

/// Print the list of available presets
pub fn print_available_presets(registry: &PresetRegistry) {
    println!("Available presets:");
    println!();
    for preset in registry.all() {
        let sizes: Vec<String> = preset.size_exponents.iter().map(|n| n.to_string()).collect();
        println!(
            "  {:<8} {} - {} [2^{{{}}}]",
            preset.name,
            preset.algorithms.join(", "),
            preset.description,
            sizes.join(",")
        );
    }
}
