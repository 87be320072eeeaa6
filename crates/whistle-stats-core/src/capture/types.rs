use super::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Method recorded when a request carries none
pub const UNKNOWN_METHOD: &str = "UNKNOWN";
/// HTTP version recorded when a request carries none
pub const UNKNOWN_HTTP_VERSION: &str = "UNKNOWN";
/// Status code recorded when a response carries none
pub const UNKNOWN_STATUS_CODE: &str = "0";

/// Top-level whistle traffic dump (`{"data": {"data": {...}}}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureDump {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub data: CaptureData,
}

/// Envelope holding the transaction map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureData {
    #[serde(default, deserialize_with = "lenient::records")]
    pub data: BTreeMap<String, TransactionRecord>,
}

impl CaptureDump {
    /// Build a dump from records keyed by transaction id
    pub fn from_records(records: impl IntoIterator<Item = (String, TransactionRecord)>) -> Self {
        Self {
            data: CaptureData {
                data: records.into_iter().collect(),
            },
        }
    }

    /// Captured transactions keyed by opaque id
    pub fn records(&self) -> &BTreeMap<String, TransactionRecord> {
        &self.data.data
    }

    pub fn len(&self) -> usize {
        self.data.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.data.is_empty()
    }
}

/// One captured HTTP exchange
///
/// Every field is optional. Timestamps and durations are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    /// Milliseconds since epoch
    #[serde(
        rename = "startTime",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<f64>,
    /// Milliseconds since epoch
    #[serde(
        rename = "endTime",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttfb: Option<f64>,
    /// Some captures store an absolute timestamp here instead of a duration
    #[serde(
        rename = "dnsTime",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub dns_time: Option<f64>,
    #[serde(rename = "useH2", default, deserialize_with = "lenient::truthy")]
    pub use_h2: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub req: RequestInfo,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub res: ResponseInfo,
}

/// Request side of a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    #[serde(default, deserialize_with = "lenient::size")]
    pub size: u64,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub method: Option<String>,
    #[serde(
        rename = "httpVersion",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub http_version: Option<String>,
}

/// Response side of a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    #[serde(default, deserialize_with = "lenient::size")]
    pub size: u64,
    /// Usually numeric, but aborted exchanges may carry a label instead
    #[serde(
        rename = "statusCode",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<String>,
}

impl TransactionRecord {
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    pub fn req_size(&self) -> u64 {
        self.req.size
    }

    pub fn res_size(&self) -> u64 {
        self.res.size
    }

    pub fn method(&self) -> &str {
        self.req.method.as_deref().unwrap_or(UNKNOWN_METHOD)
    }

    pub fn http_version(&self) -> &str {
        self.req.http_version.as_deref().unwrap_or(UNKNOWN_HTTP_VERSION)
    }

    pub fn status_code(&self) -> &str {
        self.res.status_code.as_deref().unwrap_or(UNKNOWN_STATUS_CODE)
    }
}
