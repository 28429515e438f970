// Packrun Exporter - CSV run reports
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! CSV serialization of line reports.
//!
//! One file per line, columns `start_time,end_time,produced_mass,quality`.
//! An undefined mass is written as an empty field, never a zero; the
//! quality column carries the per-row flags so degraded rows stay
//! auditable after export.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use packrun::{LineReport, RunRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timestamp out of range: {0}")]
    TimestampRange(u64),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Output path for one line's report.
pub fn report_path(dir: &Path, line_id: &str) -> PathBuf {
    dir.join(format!("runs_{line_id}.csv"))
}

/// Write one report as CSV.
pub fn write_report<W: Write>(report: &LineReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["start_time", "end_time", "produced_mass", "quality"])?;

    for run in &report.runs {
        let start = format_timestamp(run.start_ms)?;
        let end = format_timestamp(run.end_ms)?;
        csv_writer.write_record([start, end, format_mass(run), format_quality(run)])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a report to `runs_<line_id>.csv` under `dir`.
pub fn export_report(dir: &Path, report: &LineReport) -> Result<PathBuf> {
    let path = report_path(dir, &report.line_id);
    let file = File::create(&path)?;
    write_report(report, file)?;
    Ok(path)
}

fn format_timestamp(timestamp_ms: u64) -> Result<String> {
    let parsed: DateTime<Utc> = Utc
        .timestamp_millis_opt(timestamp_ms as i64)
        .single()
        .ok_or(ExportError::TimestampRange(timestamp_ms))?;
    Ok(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn format_mass(run: &RunRecord) -> String {
    match run.produced_mass {
        Some(mass) => format!("{mass:.3}"),
        None => String::new(),
    }
}

fn format_quality(run: &RunRecord) -> String {
    run.issues
        .iter()
        .map(|issue| issue.label())
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use packrun::QualityIssue;

    fn sample_report() -> LineReport {
        LineReport {
            line_id: "line-1".to_string(),
            runs: vec![
                RunRecord {
                    start_ms: 1_727_416_800_000,
                    end_ms: 1_727_420_400_000,
                    mean_weight: Some(0.25),
                    produced_mass: Some(750.0),
                    issues: vec![],
                },
                RunRecord {
                    start_ms: 1_727_424_000_000,
                    end_ms: 1_727_427_600_000,
                    mean_weight: None,
                    produced_mass: None,
                    issues: vec![QualityIssue::EmptyWeightWindow],
                },
            ],
            open_run: None,
        }
    }

    fn render(report: &LineReport) -> String {
        let mut buffer = Vec::new();
        write_report(report, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let csv = render(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "start_time,end_time,produced_mass,quality");
        assert_eq!(
            lines[1],
            "2024-09-27T06:00:00.000Z,2024-09-27T07:00:00.000Z,750.000,"
        );
    }

    #[test]
    fn test_undefined_mass_is_empty_field() {
        let csv = render(&sample_report());
        let degraded = csv.lines().nth(2).unwrap();
        assert!(degraded.contains(",,empty_weight_window"));
    }

    #[test]
    fn test_header_only_for_empty_report() {
        let report = LineReport {
            line_id: "line-9".to_string(),
            runs: vec![],
            open_run: None,
        };
        let csv = render(&report);
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_is_idempotent() {
        let report = sample_report();
        assert_eq!(render(&report), render(&report));
    }

    #[test]
    fn test_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_report(dir.path(), &sample_report()).unwrap();

        assert_eq!(path, dir.path().join("runs_line-1.csv"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("start_time,end_time"));
    }
}
