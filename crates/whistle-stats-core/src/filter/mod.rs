mod host_matcher;

pub use host_matcher::HostPattern;

use crate::capture::TransactionRecord;
use crate::metrics::{self, UNKNOWN_DOMAIN};

/// Narrows the records that take part in an analysis
///
/// All filter conditions are combined with AND logic - a record must match
/// ALL specified criteria to be analyzed.
#[derive(Debug, Default)]
pub struct RecordFilter {
    /// Host patterns to match (any pattern matching = pass)
    pub hosts: Vec<HostPattern>,
    /// HTTP status filter (e.g., "2xx", "404", "500-599")
    pub status: Option<StatusFilter>,
    /// HTTP method filter (case-insensitive)
    pub method: Option<String>,
}

impl RecordFilter {
    /// Create a new RecordFilter with default (no filtering)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host patterns from a list of pattern strings
    pub fn with_hosts(mut self, patterns: Vec<String>) -> crate::Result<Self> {
        for pattern in patterns {
            self.hosts.push(HostPattern::parse(&pattern)?);
        }
        Ok(self)
    }

    /// Set status filter from a status pattern string
    pub fn with_status(mut self, pattern: String) -> crate::Result<Self> {
        self.status = Some(StatusFilter::parse(&pattern)?);
        Ok(self)
    }

    /// Set method filter (case-insensitive)
    pub fn with_method(mut self, method: String) -> Self {
        self.method = Some(method.to_uppercase());
        self
    }

    /// True when no criteria are set and every record passes
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.status.is_none() && self.method.is_none()
    }

    /// Check if a record matches all filter criteria
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.matches_host(record) && self.matches_status(record) && self.matches_method(record)
    }

    fn matches_host(&self, record: &TransactionRecord) -> bool {
        if self.hosts.is_empty() {
            return true;
        }

        let domain = metrics::extract_domain(record.url());
        if domain == UNKNOWN_DOMAIN {
            tracing::debug!("No host in URL: {:?}", record.url());
            return false;
        }

        let hostname = metrics::authority_host(&domain);
        self.hosts.iter().any(|pattern| pattern.matches(hostname))
    }

    fn matches_status(&self, record: &TransactionRecord) -> bool {
        match &self.status {
            None => true,
            // Labels such as "aborted" never match a numeric filter
            Some(filter) => record
                .status_code()
                .trim()
                .parse::<i64>()
                .is_ok_and(|code| filter.matches(code)),
        }
    }

    fn matches_method(&self, record: &TransactionRecord) -> bool {
        match &self.method {
            None => true,
            Some(method) => record.method().to_uppercase() == *method,
        }
    }
}

/// Status filter for HTTP status codes
#[derive(Debug, Clone, PartialEq)]
pub enum StatusFilter {
    /// Exact status code (e.g., 404)
    Exact(i64),
    /// Status code range (e.g., 200-299 for "2xx")
    Range(i64, i64),
}

impl StatusFilter {
    /// Parse a status filter pattern
    ///
    /// Supports:
    /// - Exact: "404", "200"
    /// - Range shorthand: "2xx", "4xx", "5xx"
    /// - Explicit range: "200-299", "500-599"
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern = pattern.trim();

        if let Some(prefix) = pattern.strip_suffix("xx")
            && prefix.len() == 1
            && let Some(digit) = prefix.chars().next().and_then(|c| c.to_digit(10))
        {
            let start = digit as i64 * 100;
            return Ok(StatusFilter::Range(start, start + 99));
        }

        if let Some((start_str, end_str)) = pattern.split_once('-') {
            let start = start_str.trim().parse::<i64>().map_err(|_| {
                crate::Error::InvalidPattern(format!("Invalid status range start: {}", start_str))
            })?;
            let end = end_str.trim().parse::<i64>().map_err(|_| {
                crate::Error::InvalidPattern(format!("Invalid status range end: {}", end_str))
            })?;
            if start > end {
                return Err(crate::Error::InvalidPattern(format!(
                    "Status range start exceeds end: {}",
                    pattern
                )));
            }
            return Ok(StatusFilter::Range(start, end));
        }

        let code = pattern.parse::<i64>().map_err(|_| {
            crate::Error::InvalidPattern(format!("Invalid status code: {}", pattern))
        })?;
        Ok(StatusFilter::Exact(code))
    }

    pub fn matches(&self, status: i64) -> bool {
        match self {
            StatusFilter::Exact(code) => status == *code,
            StatusFilter::Range(start, end) => (*start..=*end).contains(&status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{RequestInfo, ResponseInfo};

    fn record(url: &str, method: &str, status: &str) -> TransactionRecord {
        TransactionRecord {
            url: Some(url.to_string()),
            req: RequestInfo {
                method: Some(method.to_string()),
                ..Default::default()
            },
            res: ResponseInfo {
                status_code: Some(status.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_status_filter_exact() {
        let filter = StatusFilter::parse("404").unwrap();
        assert!(filter.matches(404));
        assert!(!filter.matches(200));
    }

    #[test]
    fn test_status_filter_shorthand() {
        let filter = StatusFilter::parse("2xx").unwrap();
        assert_eq!(filter, StatusFilter::Range(200, 299));
        assert!(filter.matches(204));
        assert!(!filter.matches(300));
    }

    #[test]
    fn test_status_filter_explicit_range() {
        let filter = StatusFilter::parse("500-599").unwrap();
        assert!(filter.matches(503));
        assert!(!filter.matches(499));
        assert!(!filter.matches(600));
    }

    #[test]
    fn test_status_filter_invalid() {
        assert!(StatusFilter::parse("abc").is_err());
        assert!(StatusFilter::parse("1xxx").is_err());
        assert!(StatusFilter::parse("200-abc").is_err());
        assert!(StatusFilter::parse("599-500").is_err());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&TransactionRecord::default()));
    }

    #[test]
    fn test_host_filter_ignores_port() {
        let filter = RecordFilter::new()
            .with_hosts(vec!["*.example.com".to_string()])
            .unwrap();

        assert!(filter.matches(&record("https://api.example.com:8443/x", "GET", "200")));
        assert!(!filter.matches(&record("https://example.org/", "GET", "200")));
        assert!(!filter.matches(&record("garbage", "GET", "200")));
    }

    #[test]
    fn test_host_filter_ignores_userinfo_and_case() {
        let filter = RecordFilter::new()
            .with_hosts(vec!["host.test".to_string()])
            .unwrap();

        assert!(filter.matches(&record("http://user:pw@host.test/", "GET", "200")));
        assert!(filter.matches(&record("https://HOST.test:443/", "GET", "200")));
    }

    #[test]
    fn test_combined_filter() {
        let filter = RecordFilter::new()
            .with_hosts(vec!["api.example.com".to_string()])
            .unwrap()
            .with_status("4xx".to_string())
            .unwrap()
            .with_method("post".to_string());

        assert!(filter.matches(&record("https://api.example.com/", "POST", "404")));
        assert!(!filter.matches(&record("https://api.example.com/", "GET", "404")));
        assert!(!filter.matches(&record("https://api.example.com/", "POST", "200")));
        assert!(!filter.matches(&record("https://api.example.com/", "POST", "aborted")));
    }
}
