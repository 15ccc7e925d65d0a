//! Per-algorithm timing chart: serial and parallel means with 95% bands.
//!
//! The emitter only describes the chart ([`ChartSpec`]); drawing is left to a
//! [`ChartRenderer`]. The bundled [`SvgRenderer`] writes a standalone SVG.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::stats::{ColumnStats, Report, SummaryStat};

/// One point of a banded series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPoint {
    pub x: f64,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BandPoint {
    fn from_column(x: f64, col: &ColumnStats) -> Self {
        Self {
            x,
            mean: col.mean,
            lower: col.lower(),
            upper: col.upper(),
        }
    }
}

/// A line with a shaded band around it.
#[derive(Clone, Debug, PartialEq)]
pub struct BandSeries {
    pub label: String,
    /// CSS color of both the line and its band
    pub color: &'static str,
    pub points: Vec<BandPoint>,
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_log: bool,
    pub series: Vec<BandSeries>,
}

impl ChartSpec {
    /// Serial (red) and parallel (blue) mean time against size exponent.
    pub fn from_report(report: &Report) -> Self {
        let band = |label: &str, color: &'static str, pick: fn(&SummaryStat) -> ColumnStats| {
            BandSeries {
                label: label.to_string(),
                color,
                points: report
                    .rows
                    .iter()
                    .map(|(size, stat)| BandPoint::from_column(size.0 as f64, &pick(stat)))
                    .collect(),
            }
        };

        Self {
            title: format!("{} with 95% CI", report.algorithm.display_name()),
            x_label: "Number of Elements, 2^n (log scale)".to_string(),
            y_label: "Time (ms)".to_string(),
            x_log: true,
            series: vec![
                band("Serial Time", "red", |s| s.serial),
                band("Parallel Time", "blue", |s| s.parallel),
            ],
        }
    }
}

/// Backend that turns a [`ChartSpec`] into an image.
pub trait ChartRenderer {
    /// File extension of the produced image, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, chart: &ChartSpec, out: &mut dyn Write) -> std::io::Result<()>;
}

/// Build the chart for one report and write it as `<dir>/<algorithm>_time.<ext>`.
pub fn write_chart(report: &Report, renderer: &dyn ChartRenderer, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}_time.{}", report.algorithm, renderer.extension()));
    let chart = ChartSpec::from_report(report);
    let mut file = std::io::BufWriter::new(fs::File::create(&path)?);
    renderer.render(&chart, &mut file)?;
    file.flush()?;
    Ok(path)
}

/// Plain SVG output, no external rendering dependency.
#[derive(Clone, Copy, Debug)]
pub struct SvgRenderer {
    pub width: f64,
    pub height: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 55.0;
const Y_TICKS: usize = 5;

/// Linear map from data range to pixel range, with optional log10 on input.
struct Axis {
    log: bool,
    min: f64,
    max: f64,
    from: f64,
    to: f64,
}

impl Axis {
    fn project(&self, v: f64) -> f64 {
        let t = |v: f64| if self.log { v.log10() } else { v };
        let (lo, hi) = (t(self.min), t(self.max));
        if hi == lo {
            return (self.from + self.to) / 2.0;
        }
        self.from + (t(v) - lo) / (hi - lo) * (self.to - self.from)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn fmt_num(v: f64) -> String {
    if v.abs() >= 100.0 || v == v.trunc() {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

impl SvgRenderer {
    fn axes(&self, chart: &ChartSpec) -> (Axis, Axis) {
        let points = chart.series.iter().flat_map(|s| s.points.iter());

        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.lower);
            y_max = y_max.max(p.upper);
        }
        if !x_min.is_finite() {
            (x_min, x_max, y_min, y_max) = (1.0, 1.0, 0.0, 1.0);
        }
        // log10 needs strictly positive positions
        let x_log = chart.x_log && x_min > 0.0;
        let y_min = y_min.min(0.0);
        let y_max = if y_max > y_min { y_max * 1.05 } else { y_min + 1.0 };

        let x = Axis {
            log: x_log,
            min: x_min,
            max: x_max,
            from: MARGIN_LEFT,
            to: self.width - MARGIN_RIGHT,
        };
        let y = Axis {
            log: false,
            min: y_min,
            max: y_max,
            from: self.height - MARGIN_BOTTOM,
            to: MARGIN_TOP,
        };
        (x, y)
    }

    fn to_svg(&self, chart: &ChartSpec) -> String {
        let (x, y) = self.axes(chart);
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            self.width / 2.0,
            escape(&chart.title)
        );

        // Frame and axis labels
        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            x.from,
            y.to,
            x.to - x.from,
            y.from - y.to
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            (x.from + x.to) / 2.0,
            self.height - 12.0,
            escape(&chart.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{cy}" text-anchor="middle" transform="rotate(-90 16 {cy})">{}</text>"#,
            escape(&chart.y_label),
            cy = (y.from + y.to) / 2.0
        );

        // Ticks: one per x position, evenly spaced on y
        let mut xs: Vec<f64> = chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.x))
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        for v in xs {
            let px = x.project(v);
            let _ = writeln!(
                svg,
                r#"<line x1="{px}" y1="{y0}" x2="{px}" y2="{y1}" stroke="black"/><text x="{px}" y="{ty}" text-anchor="middle">{}</text>"#,
                fmt_num(v),
                y0 = y.from,
                y1 = y.from + 5.0,
                ty = y.from + 18.0
            );
        }
        for i in 0..=Y_TICKS {
            let v = y.min + (y.max - y.min) * i as f64 / Y_TICKS as f64;
            let py = y.project(v);
            let _ = writeln!(
                svg,
                r#"<line x1="{x0}" y1="{py}" x2="{x1}" y2="{py}" stroke="black"/><text x="{tx}" y="{ty}" text-anchor="end">{}</text>"#,
                fmt_num(v),
                x0 = x.from - 5.0,
                x1 = x.from,
                tx = x.from - 8.0,
                ty = py + 4.0
            );
        }

        for series in &chart.series {
            if series.points.is_empty() {
                continue;
            }
            let upper = series
                .points
                .iter()
                .map(|p| format!("{:.2},{:.2}", x.project(p.x), y.project(p.upper)));
            let lower = series
                .points
                .iter()
                .rev()
                .map(|p| format!("{:.2},{:.2}", x.project(p.x), y.project(p.lower)));
            let band: Vec<String> = upper.chain(lower).collect();
            let _ = writeln!(
                svg,
                r#"<polygon points="{}" fill="{}" fill-opacity="0.2" stroke="none"/>"#,
                band.join(" "),
                series.color
            );

            let line: Vec<String> = series
                .points
                .iter()
                .map(|p| format!("{:.2},{:.2}", x.project(p.x), y.project(p.mean)))
                .collect();
            let _ = writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                line.join(" "),
                series.color
            );
        }

        // Legend, top-left inside the frame
        for (i, series) in chart.series.iter().enumerate() {
            let ly = y.to + 16.0 + i as f64 * 18.0;
            let _ = writeln!(
                svg,
                r#"<line x1="{a}" y1="{ly}" x2="{b}" y2="{ly}" stroke="{c}" stroke-width="2"/><text x="{t}" y="{ty}">{}</text>"#,
                escape(&series.label),
                a = x.from + 10.0,
                b = x.from + 30.0,
                c = series.color,
                t = x.from + 36.0,
                ty = ly + 4.0
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &ChartSpec, out: &mut dyn Write) -> std::io::Result<()> {
        out.write_all(self.to_svg(chart).as_bytes())
    }
}
