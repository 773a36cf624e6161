//! Text, JSON and CSV renderings of pipeline results.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::pipeline::{Compliance, FilterApplied, GeoPoints, SchoolDetail, Summary};
use crate::records::SchoolRecord;

/// Placeholder for absent values.
pub const NO_DATA: &str = "no data";

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Serializes a value as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| NO_DATA.to_string(), |s| format!("{s:.1}/100"))
}

pub fn format_filter(filter: &FilterApplied) -> String {
    match filter {
        FilterApplied::All => "all municipalities".to_string(),
        FilterApplied::Municipality(name) => name.clone(),
        FilterApplied::Unavailable => "all municipalities (filter unavailable)".to_string(),
    }
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Schools analysed: {}\nMean safety: {}\nExcellent (>= 80): {}\nCritical (< 50): {}",
        summary.count,
        format_score(summary.mean_score),
        summary.excellent_count,
        summary.critical_count,
    )
}

/// One line per record: position, name, score.
pub fn format_ranking(records: &[SchoolRecord]) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} ({})", i + 1, record.name, format_score(record.safety_score));
    }
    out
}

pub fn format_detail(detail: &SchoolDetail) -> String {
    let mut out = String::new();
    let band = detail.band.map_or("", |b| b.label());
    let _ = writeln!(out, "{}", detail.name);
    let _ = writeln!(out, "Score: {} {band}", format_score(detail.safety_score));
    let _ = writeln!(out, "Address: {}", detail.address.as_deref().unwrap_or(NO_DATA));
    match &detail.compliance {
        Compliance::Compliant => {
            let _ = writeln!(out, "Documentation: complete, no missing documents reported");
        }
        Compliance::Missing(notes) => {
            let _ = writeln!(out, "Missing or expired documents: {notes}");
        }
    }
    out
}

/// One line per map marker, with address and missing notes as hover text.
pub fn format_map(points: &GeoPoints) -> String {
    let GeoPoints::Points(points) = points else {
        return "GPS coordinates not available in this dataset\n".to_string();
    };
    if points.is_empty() {
        return "No geolocated school found for this selection\n".to_string();
    }

    let mut out = String::new();
    for point in points {
        let record = &point.record;
        let _ = writeln!(
            out,
            "{:.5},{:.5}\t{}\t{}\t{}\t{}",
            point.latitude,
            point.longitude,
            record.name,
            format_score(record.safety_score),
            record.address.as_deref().unwrap_or(""),
            record.missing_notes.as_deref().unwrap_or(""),
        );
    }
    out
}

/// Writes ranked records to a new CSV file at `path`, replacing any existing file.
pub fn write_records_csv(path: &Path, records: &[SchoolRecord]) -> Result<()> {
    debug!(path = %path.display(), records = records.len(), "Writing CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), records = records.len(), "CSV export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{GeoPoint, SafetyBand};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SchoolRecord::new(0, "A", None));
    }

    #[test]
    fn test_summary_without_mean_shows_no_data() {
        let summary = Summary {
            count: 0,
            scored_count: 0,
            mean_score: None,
            excellent_count: 0,
            attention_count: 0,
            critical_count: 0,
        };

        let text = format_summary(&summary);
        assert!(text.contains("Mean safety: no data"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(72.26)), "72.3/100");
        assert_eq!(format_score(Some(130.0)), "130.0/100");
        assert_eq!(format_score(None), NO_DATA);
    }

    #[test]
    fn test_format_detail() {
        let detail = SchoolDetail {
            name: "IC Pirandello".to_string(),
            municipality: None,
            address: None,
            safety_score: Some(45.0),
            band: Some(SafetyBand::Critical),
            compliance: Compliance::Missing("CPI scaduto".to_string()),
        };

        let text = format_detail(&detail);
        assert!(text.contains("45.0/100 CRITICO"));
        assert!(text.contains("Address: no data"));
        assert!(text.contains("CPI scaduto"));
    }

    #[test]
    fn test_format_map_states() {
        assert!(format_map(&GeoPoints::Unsupported).contains("not available"));
        assert!(format_map(&GeoPoints::Points(vec![])).contains("No geolocated"));

        let point = GeoPoint {
            record: SchoolRecord::new(0, "A", Some(50.0))
                .with_address("Via Roma 1")
                .with_notes("DVR"),
            latitude: 40.5,
            longitude: 17.2,
        };
        let text = format_map(&GeoPoints::Points(vec![point]));
        assert!(text.contains("Via Roma 1"));
        assert!(text.contains("DVR"));
    }

    #[test]
    fn test_format_ranking_numbers_lines() {
        let text = format_ranking(&[
            SchoolRecord::new(0, "A", Some(90.0)),
            SchoolRecord::new(1, "B", Some(80.0)),
        ]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["  1. A (90.0/100)", "  2. B (80.0/100)"]);
    }

    #[test]
    fn test_write_records_csv() {
        let path = temp_path("sentinella_test_export.csv");
        let _ = fs::remove_file(&path);

        let records = vec![
            SchoolRecord::new(0, "A", Some(90.0)),
            SchoolRecord::new(1, "B", None),
        ];
        write_records_csv(&path, &records).unwrap();
        write_records_csv(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 2 data rows, file replaced rather than appended
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,name"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&SchoolRecord::new(0, "A", None)).unwrap();
        assert!(json.contains("\"safety_score\": null"));
    }
}
