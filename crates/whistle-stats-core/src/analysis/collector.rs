use super::distribution::SizeHistogram;
use crate::capture::TransactionRecord;
use crate::metrics;
use std::collections::BTreeMap;

/// Occurrence counts keyed by a discrete value
pub type Counts = BTreeMap<String, u64>;

/// Running totals for a single domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainAccumulator {
    pub count: u64,
    /// Bytes, saturating at `u64::MAX`
    pub total_req_size: u64,
    pub total_res_size: u64,
    /// Seconds
    pub total_duration: f64,
    /// Seconds
    pub total_ttfb: f64,
    pub status_codes: Counts,
    pub methods: Counts,
}

impl DomainAccumulator {
    fn record(&mut self, sample: &Sample<'_>) {
        self.count += 1;
        self.total_req_size = self.total_req_size.saturating_add(sample.req_size);
        self.total_res_size = self.total_res_size.saturating_add(sample.res_size);
        self.total_duration += sample.duration;
        self.total_ttfb += sample.ttfb;
        increment(&mut self.status_codes, sample.status_code);
        increment(&mut self.methods, sample.method);
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.total_req_size = self.total_req_size.saturating_add(other.total_req_size);
        self.total_res_size = self.total_res_size.saturating_add(other.total_res_size);
        self.total_duration += other.total_duration;
        self.total_ttfb += other.total_ttfb;
        merge_counts(&mut self.status_codes, &other.status_codes);
        merge_counts(&mut self.methods, &other.methods);
    }
}

/// Count, sum and extremes of a series without retaining it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Arithmetic mean, 0 for an empty series
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Smallest value, 0 for an empty series
    pub fn min(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min }
    }

    /// Largest value, 0 for an empty series
    pub fn max(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.max }
    }
}

/// Capture-wide totals plus the per-domain accumulators
///
/// Every field merges associatively, so partial accumulators built over
/// disjoint slices of a capture combine into the same state as one pass over
/// the whole capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalAccumulator {
    pub count: u64,
    pub total_req_size: u64,
    pub total_res_size: u64,
    pub req_sizes: SizeHistogram,
    pub res_sizes: SizeHistogram,
    pub durations: RunningStats,
    pub ttfbs: RunningStats,
    /// Only records with a usable DNS time contribute
    pub dns_times: RunningStats,
    pub status_codes: Counts,
    pub methods: Counts,
    pub http_versions: Counts,
    pub h2_count: u64,
    pub domains: BTreeMap<String, DomainAccumulator>,
    /// Earliest known request start, milliseconds since epoch
    pub first_start: Option<f64>,
    /// Latest known request end, milliseconds since epoch
    pub last_end: Option<f64>,
}

impl GlobalAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the domain and global totals
    pub fn record(&mut self, record: &TransactionRecord) {
        let sample = Sample::from_record(record);

        self.domains
            .entry(sample.domain.clone())
            .or_default()
            .record(&sample);

        self.count += 1;
        self.total_req_size = self.total_req_size.saturating_add(sample.req_size);
        self.total_res_size = self.total_res_size.saturating_add(sample.res_size);
        self.req_sizes.record(sample.req_size);
        self.res_sizes.record(sample.res_size);

        self.durations.push(sample.duration);
        self.ttfbs.push(sample.ttfb);
        if sample.dns > 0.0 {
            self.dns_times.push(sample.dns);
        }

        increment(&mut self.status_codes, sample.status_code);
        increment(&mut self.methods, sample.method);
        increment(&mut self.http_versions, record.http_version());
        if record.use_h2 {
            self.h2_count += 1;
        }

        if let Some(start) = record.start_time.filter(|t| *t != 0.0) {
            self.first_start = Some(self.first_start.map_or(start, |s| s.min(start)));
        }
        if let Some(end) = record.end_time.filter(|t| *t != 0.0) {
            self.last_end = Some(self.last_end.map_or(end, |e| e.max(end)));
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.total_req_size = self.total_req_size.saturating_add(other.total_req_size);
        self.total_res_size = self.total_res_size.saturating_add(other.total_res_size);
        self.req_sizes.merge(&other.req_sizes);
        self.res_sizes.merge(&other.res_sizes);
        self.durations.merge(&other.durations);
        self.ttfbs.merge(&other.ttfbs);
        self.dns_times.merge(&other.dns_times);
        merge_counts(&mut self.status_codes, &other.status_codes);
        merge_counts(&mut self.methods, &other.methods);
        merge_counts(&mut self.http_versions, &other.http_versions);
        self.h2_count += other.h2_count;

        for (domain, acc) in &other.domains {
            self.domains.entry(domain.clone()).or_default().merge(acc);
        }

        self.first_start = match (self.first_start, other.first_start) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.last_end = match (self.last_end, other.last_end) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Single-pass fold of a record collection into a [`GlobalAccumulator`]
pub struct Collector;

impl Collector {
    pub fn collect<'a, I>(records: I) -> GlobalAccumulator
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        tracing::debug!("Collecting traffic statistics");

        let mut acc = GlobalAccumulator::new();
        for record in records {
            acc.record(record);
        }

        tracing::debug!(
            "Collected {} records across {} domains",
            acc.count,
            acc.domains.len()
        );

        acc
    }
}

/// Derived values of one record, computed once and shared by both scopes
struct Sample<'a> {
    domain: String,
    req_size: u64,
    res_size: u64,
    duration: f64,
    ttfb: f64,
    dns: f64,
    status_code: &'a str,
    method: &'a str,
}

impl<'a> Sample<'a> {
    fn from_record(record: &'a TransactionRecord) -> Self {
        Self {
            domain: metrics::extract_domain(record.url()),
            req_size: record.req_size(),
            res_size: record.res_size(),
            duration: metrics::duration_secs(record),
            ttfb: metrics::ttfb_secs(record),
            dns: metrics::dns_secs(record),
            status_code: record.status_code(),
            method: record.method(),
        }
    }
}

fn increment(counts: &mut Counts, key: &str) {
    match counts.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            counts.insert(key.to_string(), 1);
        }
    }
}

fn merge_counts(into: &mut Counts, from: &Counts) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}
