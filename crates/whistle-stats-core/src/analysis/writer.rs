use super::StatisticsReport;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ReportWriter;

impl ReportWriter {
    /// Write a report as pretty-printed UTF-8 JSON
    pub fn to_file(report: &StatisticsReport, path: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!("Successfully wrote report to {}", path.display());

        Ok(())
    }

    /// Convert a report to a pretty-printed JSON string
    pub fn to_string(report: &StatisticsReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, TrafficAnalyzer};
    use crate::capture::CaptureReader;

    #[test]
    fn test_non_ascii_is_written_literally() {
        let dump = CaptureReader::from_str(
            r#"{"data": {"data": {"1": {"url": "https://example.com/", "req": {"method": "조회"}}}}}"#,
        )
        .unwrap();
        let report = TrafficAnalyzer::default().analyze(&dump).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        ReportWriter::to_file(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"조회\": 1"));
        assert!(!written.contains("\\u"));

        let parsed: StatisticsReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_report_to_string_shape() {
        let report = TrafficAnalyzer::default()
            .analyze(&CaptureReader::from_str("{}").unwrap())
            .unwrap();

        let json = ReportWriter::to_string(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for section in [
            "basic",
            "domains",
            "status_codes",
            "methods",
            "http_versions",
            "size_distribution",
        ] {
            assert!(value.get(section).is_some(), "missing section {}", section);
        }
        assert_eq!(value["size_distribution"]["req_size_ranges"]["< 1KB"], 0);
    }
}
