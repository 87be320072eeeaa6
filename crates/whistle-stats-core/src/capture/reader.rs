use super::types::CaptureDump;
use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct CaptureReader;

impl CaptureReader {
    /// Read and parse a capture dump from the given path
    pub fn from_file(path: &Path) -> Result<CaptureDump> {
        tracing::debug!("Reading capture file from: {}", path.display());

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a capture dump from any reader (stdin, in-memory buffers)
    pub fn from_reader<R: Read>(reader: R) -> Result<CaptureDump> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Parse a capture dump from a JSON string
    pub fn from_str(content: &str) -> Result<CaptureDump> {
        tracing::debug!("Parsing capture from string");

        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Only an object can hold the `data` envelope; arrays and scalars are rejected
    fn from_value(value: Value) -> Result<CaptureDump> {
        if !value.is_object() {
            return Err(Error::InvalidStructure(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&value)
            )));
        }

        let dump: CaptureDump = serde_json::from_value(value)?;
        Self::log_loaded(&dump);
        Ok(dump)
    }

    fn log_loaded(dump: &CaptureDump) {
        if dump.is_empty() {
            tracing::warn!("Capture contains no traffic records");
        } else {
            tracing::info!("Successfully parsed capture with {} records", dump.len());
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_capture() {
        let json = r#"{
            "data": {
                "data": {
                    "1700000000000-1": {"url": "https://api.example.com/", "res": {"statusCode": 200}}
                }
            }
        }"#;

        let dump = CaptureReader::from_str(json).unwrap();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump.records()["1700000000000-1"].status_code(), "200");
    }

    #[test]
    fn test_parse_from_reader() {
        let json = br#"{"data": {"data": {}}}"#;

        let dump = CaptureReader::from_reader(&json[..]).unwrap();
        assert!(dump.is_empty());
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"data": {"data": {"a": {"url": "http://a.test/"}}}}"#)
            .unwrap();

        let dump = CaptureReader::from_file(file.path()).unwrap();
        assert_eq!(dump.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = CaptureReader::from_str("{not json");
        assert!(matches!(result, Err(crate::Error::Parse(_))));
    }

    #[test]
    fn test_non_object_top_level_is_rejected() {
        for content in ["[]", "[{\"data\": {}}]", "42", "\"capture\"", "null"] {
            let result = CaptureReader::from_str(content);
            assert!(
                matches!(result, Err(crate::Error::InvalidStructure(_))),
                "accepted {}",
                content
            );
        }

        let result = CaptureReader::from_reader(&b"[]"[..]);
        assert!(matches!(result, Err(crate::Error::InvalidStructure(_))));
    }

    #[test]
    fn test_object_without_envelope_is_empty() {
        let dump = CaptureReader::from_str("{}").unwrap();
        assert!(dump.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CaptureReader::from_file(Path::new("/nonexistent/capture.json"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
