use super::{Analyzer, Collector, DEFAULT_TOP_DOMAINS, Reporter, StatisticsReport};
use crate::Result;
use crate::capture::CaptureDump;
use crate::filter::RecordFilter;

/// Runs the collector and reporter over a capture dump
pub struct TrafficAnalyzer {
    top_n: usize,
    filter: RecordFilter,
}

impl TrafficAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            filter: RecordFilter::default(),
        }
    }

    /// Only analyze records accepted by `filter`
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for TrafficAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_DOMAINS)
    }
}

impl Analyzer for TrafficAnalyzer {
    type Output = StatisticsReport;

    fn analyze(&self, dump: &CaptureDump) -> Result<Self::Output> {
        tracing::debug!("Analyzing {} captured records", dump.len());

        let records = dump
            .records()
            .values()
            .filter(|record| self.filter.matches(record));
        let acc = Collector::collect(records);

        if !self.filter.is_empty() {
            tracing::info!(
                "Filter kept {} of {} records",
                acc.count,
                dump.len()
            );
        }

        Ok(Reporter::new(self.top_n).report(&acc))
    }
}
