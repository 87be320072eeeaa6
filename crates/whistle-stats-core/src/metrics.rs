//! Per-record derived metrics.
//!
//! Each function is total: missing or zero inputs produce `0.0` (or the
//! `"unknown"` domain) instead of an error.

use crate::capture::TransactionRecord;
use url::Url;

/// Domain reported for URLs without a usable authority
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// DNS times at or above this many milliseconds are absolute timestamps
/// written into the field by mistake, not elapsed durations
pub const DNS_TIME_CEILING_MS: f64 = 100_000.0;

/// Extract the authority of a URL exactly as written
///
/// The authority is the text between `scheme://` and the first `/`, `?` or
/// `#`, so userinfo, letter case and default ports are all preserved
/// (`https://a.example.com:443/` and `https://a.example.com/` are distinct
/// domains). URLs that fail to parse or carry no authority yield
/// [`UNKNOWN_DOMAIN`].
pub fn extract_domain(url: &str) -> String {
    let url = url.trim_start();
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::trace!("Failed to parse URL {:?}: {}", url, e);
            return UNKNOWN_DOMAIN.to_string();
        }
    };

    let authority = url
        .get(parsed.scheme().len()..)
        .and_then(|rest| rest.strip_prefix("://"))
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .unwrap_or_default();

    if authority.is_empty() {
        UNKNOWN_DOMAIN.to_string()
    } else {
        authority.to_string()
    }
}

/// Host part of a domain produced by [`extract_domain`], without userinfo or port
pub fn authority_host(domain: &str) -> &str {
    let host = domain.rsplit_once('@').map_or(domain, |(_, host)| host);
    if host.starts_with('[') {
        // IPv6 literal: "[::1]:8080"
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Wall-clock duration in seconds, when both endpoints are known
///
/// An end before the start is clock skew and counts as zero.
pub fn duration_secs(record: &TransactionRecord) -> f64 {
    match (truthy(record.start_time), truthy(record.end_time)) {
        (Some(start), Some(end)) => ((end - start) / 1000.0).max(0.0),
        _ => 0.0,
    }
}

/// Time to first byte in seconds
pub fn ttfb_secs(record: &TransactionRecord) -> f64 {
    truthy(record.ttfb).map_or(0.0, |ttfb| ttfb / 1000.0)
}

/// DNS lookup time in seconds; values at or above the ceiling are discarded
pub fn dns_secs(record: &TransactionRecord) -> f64 {
    truthy(record.dns_time)
        .filter(|dns| *dns < DNS_TIME_CEILING_MS)
        .map_or(0.0, |dns| dns / 1000.0)
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
