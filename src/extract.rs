//! Pull the serial and parallel timings out of a program's output.
//!
//! Two modes are supported:
//! - **positional**: the first two numbers in the text are serial then
//!   parallel, anything after them is ignored.
//! - **labeled**: each timing must sit on its own line after a label, e.g.
//!   `Merge Sort time: 12 ms` / `Merge Sort Parallel time: 4 ms`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{BenchError, Result};
use crate::types::TrialResult;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
    })
}

fn default_serial_label() -> String {
    "time".to_string()
}

fn default_parallel_label() -> String {
    "parallel".to_string()
}

/// Output contract expected from the sorting programs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExtractMode {
    /// First number is serial, second is parallel
    #[default]
    Positional,
    /// Numbers follow case-insensitive labels on separate lines.
    /// A line matching `parallel` never counts as the serial line.
    Labeled {
        #[serde(default = "default_serial_label")]
        serial: String,
        #[serde(default = "default_parallel_label")]
        parallel: String,
    },
}

impl ExtractMode {
    pub fn labeled() -> Self {
        ExtractMode::Labeled {
            serial: default_serial_label(),
            parallel: default_parallel_label(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let ExtractMode::Labeled { serial, parallel } = self {
            if serial.trim().is_empty() || parallel.trim().is_empty() {
                return Err(BenchError::config("extraction labels must not be blank"));
            }
            if serial.eq_ignore_ascii_case(parallel) {
                return Err(BenchError::config("serial and parallel labels must differ"));
            }
        }
        Ok(())
    }

    /// Extract one trial result according to this mode.
    pub fn extract(&self, output: &str) -> Result<TrialResult> {
        match self {
            ExtractMode::Positional => extract(output),
            ExtractMode::Labeled { serial, parallel } => extract_labeled(output, serial, parallel),
        }
    }
}

/// Parse the number starting at `start..end` in `text`, rejecting a leading minus.
fn parse_token(text: &str, start: usize, end: usize) -> Result<f64> {
    if text[..start].ends_with('-') {
        return Err(BenchError::parse(
            format!("negative timing -{}", &text[start..end]),
            text,
        ));
    }
    let token = &text[start..end];
    let value: f64 = token
        .parse()
        .map_err(|_| BenchError::parse(format!("'{}' is not a number", token), text))?;
    if !value.is_finite() {
        return Err(BenchError::parse(format!("'{}' is not finite", token), text));
    }
    Ok(value)
}

/// Positional extraction: the first two numbers are serial and parallel time.
pub fn extract(output: &str) -> Result<TrialResult> {
    let mut matches = number_pattern().find_iter(output);

    let mut next = |which: &str| -> Result<f64> {
        let m = matches.next().ok_or_else(|| {
            BenchError::parse(format!("missing {} time, expected two numbers", which), output)
        })?;
        parse_token(output, m.start(), m.end())
    };

    let serial_ms = next("serial")?;
    let parallel_ms = next("parallel")?;
    Ok(TrialResult::new(serial_ms, parallel_ms))
}

/// First number after `label` on `line`, if the label occurs.
fn labeled_value(line: &str, lowered: &str, label: &str) -> Option<Result<f64>> {
    let at = lowered.find(label)? + label.len();
    let m = number_pattern().find_at(line, at)?;
    Some(parse_token(line, m.start(), m.end()))
}

/// Labeled extraction: one serial line and one parallel line, each labeled.
pub fn extract_labeled(
    output: &str,
    serial_label: &str,
    parallel_label: &str,
) -> Result<TrialResult> {
    let serial_label = serial_label.to_ascii_lowercase();
    let parallel_label = parallel_label.to_ascii_lowercase();

    let mut serial = None;
    let mut parallel = None;

    for line in output.lines() {
        let lowered = line.to_ascii_lowercase();
        let (slot, name, label) = if lowered.contains(&parallel_label) {
            (&mut parallel, "parallel", &parallel_label)
        } else if lowered.contains(&serial_label) {
            (&mut serial, "serial", &serial_label)
        } else {
            continue;
        };

        let Some(value) = labeled_value(line, &lowered, label) else {
            return Err(BenchError::parse(format!("{} line has no number", name), output));
        };
        if slot.is_some() {
            return Err(BenchError::parse(format!("{} time reported twice", name), output));
        }
        *slot = Some(value.map_err(|e| match e {
            BenchError::ParseFailure { message, .. } => BenchError::parse(message, output),
            other => other,
        })?);
    }

    match (serial, parallel) {
        (Some(serial_ms), Some(parallel_ms)) => Ok(TrialResult::new(serial_ms, parallel_ms)),
        (None, _) => Err(BenchError::parse("no serial time line", output)),
        (_, None) => Err(BenchError::parse("no parallel time line", output)),
    }
}
