mod collector;
mod distribution;
mod reporter;
mod traffic;
mod writer;

pub use collector::{Collector, Counts, DomainAccumulator, GlobalAccumulator, RunningStats};
pub use distribution::{Distribution, SizeHistogram};
pub use reporter::{Reporter, compare_status_codes};
pub use traffic::TrafficAnalyzer;
pub use writer::ReportWriter;

use crate::capture::CaptureDump;
use serde::{Deserialize, Serialize};

/// Default number of domains kept in the ranking
pub const DEFAULT_TOP_DOMAINS: usize = 10;

/// Aggregate statistics for one capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub basic: BasicStats,
    pub domains: Vec<DomainStats>,
    pub status_codes: Distribution,
    pub methods: Distribution,
    pub http_versions: Distribution,
    pub size_distribution: SizeDistribution,
}

impl StatisticsReport {
    /// True when the capture held no records at all
    pub fn is_empty(&self) -> bool {
        self.basic.total_requests == 0
    }

    /// Share of all requests, in percent; 0 when there are no requests
    pub fn percentage_of_total(&self, count: u64) -> f64 {
        crate::format::percentage(count, self.basic.total_requests)
    }
}

/// Sizes in bytes, times in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_requests: u64,
    pub total_req_size: u64,
    pub total_res_size: u64,
    pub avg_req_size: f64,
    pub avg_res_size: f64,
    pub avg_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub avg_ttfb: f64,
    pub min_ttfb: f64,
    pub max_ttfb: f64,
    pub avg_dns_time: f64,
    pub http2_usage: Http2Usage,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Http2Usage {
    pub total: u64,
    pub percentage: f64,
}

/// Window between the earliest request start and the latest request end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
    /// Seconds
    pub span: f64,
}

/// One entry of the top-domain ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainStats {
    pub domain: String,
    pub requests: u64,
    pub avg_req_size: f64,
    pub avg_res_size: f64,
    pub avg_duration: f64,
    pub avg_ttfb: f64,
    pub status_codes: Distribution,
    pub methods: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub total_req_size: u64,
    pub total_res_size: u64,
    pub req_size_ranges: SizeHistogram,
    pub res_size_ranges: SizeHistogram,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, dump: &CaptureDump) -> crate::Result<Self::Output>;
}
