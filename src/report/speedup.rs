//! Combined speedup table: one row per size exponent, one column per algorithm.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BenchError, Result};
use crate::stats::Report;
use crate::types::{AlgorithmId, SizeExponent};

/// Header of the index column.
pub const INDEX_HEADER: &str = "size_exponent";

/// `speedup_<alg1>_<alg2>...csv`, naming every algorithm in the table.
pub fn speedup_file_name(reports: &[Report]) -> String {
    let names: Vec<&str> = reports.iter().map(|r| r.algorithm.as_str()).collect();
    format!("speedup_{}.csv", names.join("_"))
}

/// Speedup figures read back from a table.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedupTable {
    pub algorithms: Vec<AlgorithmId>,
    /// Each row: size exponent and one speedup per algorithm, in column order
    pub rows: Vec<(SizeExponent, Vec<f64>)>,
}

impl SpeedupTable {
    pub fn get(&self, algorithm: &str, size: SizeExponent) -> Option<f64> {
        let col = self.algorithms.iter().position(|a| a.as_str() == algorithm)?;
        self.rows
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, values)| values[col])
    }
}

/// Write the speedup of every report as CSV; all reports must share the same sizes.
pub fn write_speedup_table(reports: &[Report], path: &Path) -> Result<()> {
    let first = reports
        .first()
        .ok_or_else(|| BenchError::config("no reports to write a speedup table for"))?;
    let sizes: Vec<SizeExponent> = first.sizes().collect();

    for report in reports {
        if !report.sizes().eq(sizes.iter().copied()) {
            return Err(BenchError::config(format!(
                "report for {} covers different sizes than {}",
                report.algorithm, first.algorithm
            )));
        }
    }

    let mut file = BufWriter::new(File::create(path)?);

    write!(file, "{}", INDEX_HEADER)?;
    for report in reports {
        write!(file, ",{}", report.algorithm)?;
    }
    writeln!(file)?;

    for (row, size) in sizes.iter().enumerate() {
        write!(file, "{}", size)?;
        for report in reports {
            write!(file, ",{}", report.rows[row].1.speedup)?;
        }
        writeln!(file)?;
    }

    file.flush()?;
    Ok(())
}

/// Parse a table written by [`write_speedup_table`].
pub fn read_speedup_table(path: &Path) -> Result<SpeedupTable> {
    let text = std::fs::read_to_string(path)?;
    let bad = |msg: String| BenchError::config(format!("{}: {}", path.display(), msg));

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or_else(|| bad("empty speedup table".to_string()))?;
    let mut columns = header.split(',');
    if columns.next() != Some(INDEX_HEADER) {
        return Err(bad(format!("first column must be '{}'", INDEX_HEADER)));
    }
    let algorithms: Vec<AlgorithmId> = columns.map(AlgorithmId::from).collect();

    let mut rows = Vec::new();
    for (n, line) in lines.enumerate() {
        let mut cells = line.split(',');
        let size = cells
            .next()
            .and_then(|c| c.trim().parse::<u32>().ok())
            .ok_or_else(|| bad(format!("row {}: invalid size exponent", n + 1)))?;
        let values = cells
            .map(|c| c.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| bad(format!("row {}: {}", n + 1, e)))?;
        if values.len() != algorithms.len() {
            return Err(bad(format!(
                "row {}: expected {} values, found {}",
                n + 1,
                algorithms.len(),
                values.len()
            )));
        }
        rows.push((SizeExponent(size), values));
    }

    Ok(SpeedupTable { algorithms, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;
    use crate::types::TrialResult;

    fn report(name: &str, data: &[(u32, f64, f64)]) -> Report {
        Report {
            algorithm: AlgorithmId::from(name),
            rows: data
                .iter()
                .map(|&(n, s, p)| (SizeExponent(n), summarize(&[TrialResult::new(s, p)]).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn test_file_name() {
        let reports = vec![
            report("mergeSort", &[(12, 1.0, 1.0)]),
            report("heapSort", &[(12, 1.0, 1.0)]),
        ];
        assert_eq!(speedup_file_name(&reports), "speedup_mergeSort_heapSort.csv");
    }

    #[test]
    fn test_round_trip() {
        let reports = vec![
            report("mergeSort", &[(12, 10.0, 3.0), (14, 41.7, 9.1)]),
            report("bitonicSort", &[(12, 7.0, 7.0), (14, 0.3, 0.7)]),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(speedup_file_name(&reports));
        write_speedup_table(&reports, &path).unwrap();

        let table = read_speedup_table(&path).unwrap();
        assert_eq!(
            table.algorithms,
            vec![AlgorithmId::from("mergeSort"), AlgorithmId::from("bitonicSort")]
        );
        assert_eq!(table.rows.len(), 2);
        for r in &reports {
            for (size, stat) in &r.rows {
                let read = table.get(r.algorithm.as_str(), *size).unwrap();
                assert!((read - stat.speedup).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_header_layout() {
        let reports = vec![report("quickSort", &[(5, 4.0, 2.0)])];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        write_speedup_table(&reports, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "size_exponent,quickSort\n5,2\n");
    }

    #[test]
    fn test_empty_and_mismatched_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        assert!(write_speedup_table(&[], &path).is_err());

        let reports = vec![
            report("a", &[(5, 1.0, 1.0)]),
            report("b", &[(6, 1.0, 1.0)]),
        ];
        assert!(write_speedup_table(&reports, &path).is_err());
    }

    #[test]
    fn test_read_rejects_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "size_exponent,a,b\n5,1.0\n").unwrap();
        assert!(read_speedup_table(&path).is_err());
    }
}
