use super::collector::{DomainAccumulator, GlobalAccumulator};
use super::distribution::Distribution;
use super::{
    BasicStats, DEFAULT_TOP_DOMAINS, DomainStats, Http2Usage, SizeDistribution, StatisticsReport,
    TimeRange,
};
use crate::format::percentage;
use chrono::{DateTime, SecondsFormat};
use std::cmp::Ordering;

/// Turns accumulator state into a [`StatisticsReport`]
///
/// Reporting never fails: an empty accumulator yields a report of zeros and
/// empty distributions.
pub struct Reporter {
    top_n: usize,
}

impl Reporter {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn report(&self, acc: &GlobalAccumulator) -> StatisticsReport {
        tracing::debug!("Building statistics report");

        let report = StatisticsReport {
            basic: basic_stats(acc),
            domains: self.rank_domains(acc),
            status_codes: Distribution::sorted_by(&acc.status_codes, compare_status_codes),
            methods: Distribution::lexical(&acc.methods),
            http_versions: Distribution::lexical(&acc.http_versions),
            size_distribution: SizeDistribution {
                total_req_size: acc.total_req_size,
                total_res_size: acc.total_res_size,
                req_size_ranges: acc.req_sizes,
                res_size_ranges: acc.res_sizes,
            },
        };

        tracing::info!(
            "Report complete: {} requests, {} domains, avg={:.3}s",
            report.basic.total_requests,
            acc.domains.len(),
            report.basic.avg_duration
        );

        report
    }

    /// Busiest domains first; equal counts fall back to domain name order
    fn rank_domains(&self, acc: &GlobalAccumulator) -> Vec<DomainStats> {
        let mut ranked: Vec<(&String, &DomainAccumulator)> = acc.domains.iter().collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(domain, stats)| domain_stats(domain, stats))
            .collect()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_DOMAINS)
    }
}

/// Order status codes numerically, with non-numeric labels after all numbers
///
/// Labels that do not parse as integers (`"aborted"`, `"unknown"`) compare
/// lexically among themselves.
pub fn compare_status_codes(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn basic_stats(acc: &GlobalAccumulator) -> BasicStats {
    BasicStats {
        total_requests: acc.count,
        total_req_size: acc.total_req_size,
        total_res_size: acc.total_res_size,
        avg_req_size: average(acc.total_req_size as f64, acc.count),
        avg_res_size: average(acc.total_res_size as f64, acc.count),
        avg_duration: acc.durations.mean(),
        min_duration: acc.durations.min(),
        max_duration: acc.durations.max(),
        avg_ttfb: acc.ttfbs.mean(),
        min_ttfb: acc.ttfbs.min(),
        max_ttfb: acc.ttfbs.max(),
        avg_dns_time: acc.dns_times.mean(),
        http2_usage: Http2Usage {
            total: acc.h2_count,
            percentage: percentage(acc.h2_count, acc.count),
        },
        time_range: time_range(acc.first_start, acc.last_end),
    }
}

fn domain_stats(domain: &str, acc: &DomainAccumulator) -> DomainStats {
    DomainStats {
        domain: domain.to_string(),
        requests: acc.count,
        avg_req_size: average(acc.total_req_size as f64, acc.count),
        avg_res_size: average(acc.total_res_size as f64, acc.count),
        avg_duration: average(acc.total_duration, acc.count),
        avg_ttfb: average(acc.total_ttfb, acc.count),
        status_codes: Distribution::sorted_by(&acc.status_codes, compare_status_codes),
        methods: Distribution::lexical(&acc.methods),
    }
}

fn time_range(first_start: Option<f64>, last_end: Option<f64>) -> Option<TimeRange> {
    let (start_ms, end_ms) = (first_start?, last_end?);
    let start = DateTime::from_timestamp_millis(start_ms as i64)?;
    let end = DateTime::from_timestamp_millis(end_ms as i64)?;

    Some(TimeRange {
        start: start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end: end.to_rfc3339_opts(SecondsFormat::Millis, true),
        span: (end_ms - start_ms) / 1000.0,
    })
}

fn average(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
