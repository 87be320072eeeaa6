use crate::OutputFormat;
use anyhow::Result;
use console::style;
use std::io::{self, Write};
use std::path::Path;
use whistle_stats_core::analysis::{
    Analyzer, DEFAULT_TOP_DOMAINS, Distribution, ReportWriter, SizeHistogram, StatisticsReport,
    TrafficAnalyzer,
};
use whistle_stats_core::capture::{CaptureDump, CaptureReader};
use whistle_stats_core::filter::RecordFilter;
use whistle_stats_core::format::{format_size, format_time};

const RULE_WIDTH: usize = 60;

/// Options of the `stats` command that shape the analysis and its rendering
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Number of domains kept in the ranking
    pub top: usize,
    /// Show each top domain's status-code and method breakdown
    pub detailed: bool,
    /// Host patterns (comma-separated values allowed)
    pub hosts: Vec<String>,
    pub status: Option<String>,
    pub method: Option<String>,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP_DOMAINS,
            detailed: false,
            hosts: Vec::new(),
            status: None,
            method: None,
        }
    }
}

impl StatsOptions {
    fn record_filter(&self) -> Result<RecordFilter> {
        let host_patterns: Vec<String> = self
            .hosts
            .iter()
            .flat_map(|h| h.split(',').map(|s| s.trim().to_string()))
            .filter(|h| !h.is_empty())
            .collect();

        let mut filter = RecordFilter::new();

        if !host_patterns.is_empty() {
            filter = filter.with_hosts(host_patterns)?;
        }

        if let Some(status_pattern) = &self.status {
            filter = filter.with_status(status_pattern.clone())?;
        }

        if let Some(method_filter) = &self.method {
            filter = filter.with_method(method_filter.clone());
        }

        Ok(filter)
    }
}

/// Read a capture (from `file`, or stdin when absent)
pub fn read_capture(file: Option<&Path>) -> Result<CaptureDump> {
    let dump = match file {
        Some(path) => {
            tracing::debug!("Reading capture file: {}", path.display());
            CaptureReader::from_file(path)?
        }
        None => {
            tracing::debug!("Reading capture from stdin");
            CaptureReader::from_reader(io::stdin().lock())?
        }
    };
    Ok(dump)
}

/// Analyze a capture file and return the structured report
pub fn analyze_capture(file: &Path, options: &StatsOptions) -> Result<StatisticsReport> {
    let dump = CaptureReader::from_file(file)?;
    analyze_dump(&dump, options)
}

pub fn analyze_dump(dump: &CaptureDump, options: &StatsOptions) -> Result<StatisticsReport> {
    let analyzer = TrafficAnalyzer::new(options.top).with_filter(options.record_filter()?);
    Ok(analyzer.analyze(dump)?)
}

pub fn execute(
    file: Option<&Path>,
    output: Option<&Path>,
    options: &StatsOptions,
    format: OutputFormat,
) -> Result<()> {
    match file {
        Some(path) => tracing::info!("Analyzing capture file: {}", path.display()),
        None => tracing::info!("Analyzing capture from stdin"),
    }

    let dump = read_capture(file)?;
    let report = analyze_dump(&dump, options)?;

    if let Some(path) = output {
        ReportWriter::to_file(&report, path)?;
        println!("Results saved to {}", path.display());
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => output_json(&mut out, &report)?,
        OutputFormat::Table => output_table(&mut out, &report)?,
        OutputFormat::Pretty => output_pretty(&mut out, &report, options.detailed)?,
    }
    out.flush()?;

    Ok(())
}

pub fn output_json<W: Write>(out: &mut W, report: &StatisticsReport) -> Result<()> {
    let json = ReportWriter::to_string(report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Labeled multi-section report for terminals
pub fn output_pretty<W: Write>(
    out: &mut W,
    report: &StatisticsReport,
    detailed: bool,
) -> io::Result<()> {
    if report.is_empty() {
        writeln!(out, "{}", style("No traffic data available").yellow())?;
        return Ok(());
    }

    let rule = "=".repeat(RULE_WIDTH);
    let basic = &report.basic;

    writeln!(out, "{}", style(&rule).cyan())?;
    writeln!(out, "{}", style("Whistle Traffic Statistics").bold().cyan())?;
    writeln!(out, "{}", style(&rule).cyan())?;

    section(out, "Basic Statistics")?;
    writeln!(
        out,
        "  Total Requests:       {}",
        style(group_thousands(basic.total_requests)).yellow()
    )?;
    writeln!(out, "  Total Request Size:   {}", format_size(basic.total_req_size as f64))?;
    writeln!(out, "  Total Response Size:  {}", format_size(basic.total_res_size as f64))?;
    writeln!(out, "  Avg Request Size:     {}", format_size(basic.avg_req_size))?;
    writeln!(out, "  Avg Response Size:    {}", format_size(basic.avg_res_size))?;
    writeln!(out, "  Avg Response Time:    {}", format_time(basic.avg_duration))?;
    writeln!(out, "  Min Response Time:    {}", format_time(basic.min_duration))?;
    writeln!(out, "  Max Response Time:    {}", format_time(basic.max_duration))?;
    writeln!(out, "  Avg TTFB:             {}", format_time(basic.avg_ttfb))?;
    writeln!(out, "  Min TTFB:             {}", format_time(basic.min_ttfb))?;
    writeln!(out, "  Max TTFB:             {}", format_time(basic.max_ttfb))?;
    if basic.avg_dns_time > 0.0 {
        writeln!(out, "  Avg DNS Time:         {}", format_time(basic.avg_dns_time))?;
    }
    writeln!(
        out,
        "  HTTP/2 Usage:         {} ({:.1}%)",
        basic.http2_usage.total, basic.http2_usage.percentage
    )?;
    if let Some(range) = &basic.time_range {
        writeln!(
            out,
            "  Time Range:           {} to {} ({})",
            range.start,
            range.end,
            format_time(range.span)
        )?;
    }

    section(out, &format!("Top {} Domains", report.domains.len()))?;
    for (i, domain) in report.domains.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "  {}. {}", i + 1, style(&domain.domain).green())?;
        writeln!(out, "     Requests:           {}", domain.requests)?;
        writeln!(out, "     Avg Request Size:   {}", format_size(domain.avg_req_size))?;
        writeln!(out, "     Avg Response Size:  {}", format_size(domain.avg_res_size))?;
        writeln!(out, "     Avg Response Time:  {}", format_time(domain.avg_duration))?;
        writeln!(out, "     Avg TTFB:           {}", format_time(domain.avg_ttfb))?;
        if detailed && !domain.status_codes.is_empty() {
            writeln!(out, "     Status Codes:       {}", inline_counts(&domain.status_codes))?;
        }
        if detailed && !domain.methods.is_empty() {
            writeln!(out, "     Methods:            {}", inline_counts(&domain.methods))?;
        }
    }

    section(out, "Status Codes")?;
    distribution_lines(out, report, &report.status_codes)?;

    section(out, "Methods")?;
    distribution_lines(out, report, &report.methods)?;

    section(out, "HTTP Versions")?;
    distribution_lines(out, report, &report.http_versions)?;

    section(out, "Request Size Distribution")?;
    histogram_lines(out, report, &report.size_distribution.req_size_ranges)?;

    section(out, "Response Size Distribution")?;
    histogram_lines(out, report, &report.size_distribution.res_size_ranges)?;

    writeln!(out)?;
    writeln!(out, "{}", style(&rule).cyan())?;
    Ok(())
}

/// CSV-style rows for spreadsheets and scripts
pub fn output_table<W: Write>(out: &mut W, report: &StatisticsReport) -> io::Result<()> {
    let basic = &report.basic;

    writeln!(out, "Metric,Value")?;
    writeln!(out, "Total Requests,{}", basic.total_requests)?;
    writeln!(out, "Total Request Size (bytes),{}", basic.total_req_size)?;
    writeln!(out, "Total Response Size (bytes),{}", basic.total_res_size)?;
    writeln!(out, "Avg Request Size (bytes),{:.2}", basic.avg_req_size)?;
    writeln!(out, "Avg Response Size (bytes),{:.2}", basic.avg_res_size)?;
    writeln!(out, "Avg Duration (s),{:.3}", basic.avg_duration)?;
    writeln!(out, "Min Duration (s),{:.3}", basic.min_duration)?;
    writeln!(out, "Max Duration (s),{:.3}", basic.max_duration)?;
    writeln!(out, "Avg TTFB (s),{:.3}", basic.avg_ttfb)?;
    writeln!(out, "Min TTFB (s),{:.3}", basic.min_ttfb)?;
    writeln!(out, "Max TTFB (s),{:.3}", basic.max_ttfb)?;
    writeln!(out, "Avg DNS Time (s),{:.3}", basic.avg_dns_time)?;
    writeln!(out, "HTTP/2 Requests,{}", basic.http2_usage.total)?;
    writeln!(out, "HTTP/2 Share (%),{:.1}", basic.http2_usage.percentage)?;

    writeln!(out)?;
    writeln!(
        out,
        "Domain,Requests,Avg Request Size (bytes),Avg Response Size (bytes),Avg Duration (s),Avg TTFB (s)"
    )?;
    for domain in &report.domains {
        writeln!(
            out,
            "{},{},{:.2},{:.2},{:.3},{:.3}",
            domain.domain,
            domain.requests,
            domain.avg_req_size,
            domain.avg_res_size,
            domain.avg_duration,
            domain.avg_ttfb
        )?;
    }

    for (title, distribution) in [
        ("Status Code", &report.status_codes),
        ("Method", &report.methods),
        ("HTTP Version", &report.http_versions),
    ] {
        writeln!(out)?;
        writeln!(out, "{},Count", title)?;
        for (key, count) in distribution.iter() {
            writeln!(out, "{},{}", key, count)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Size Range,Requests,Responses")?;
    let req = report.size_distribution.req_size_ranges.buckets();
    let res = report.size_distribution.res_size_ranges.buckets();
    for ((label, req_count), (_, res_count)) in req.iter().zip(res.iter()) {
        writeln!(out, "{},{},{}", label, req_count, res_count)?;
    }

    Ok(())
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(title).bold())
}

fn distribution_lines<W: Write>(
    out: &mut W,
    report: &StatisticsReport,
    distribution: &Distribution,
) -> io::Result<()> {
    for (key, count) in distribution.iter() {
        writeln!(
            out,
            "  {}: {} ({:.1}%)",
            key,
            count,
            report.percentage_of_total(count)
        )?;
    }
    Ok(())
}

fn histogram_lines<W: Write>(
    out: &mut W,
    report: &StatisticsReport,
    histogram: &SizeHistogram,
) -> io::Result<()> {
    for (label, count) in histogram.buckets() {
        writeln!(
            out,
            "  {}: {} ({:.1}%)",
            label,
            count,
            report.percentage_of_total(count)
        )?;
    }
    Ok(())
}

fn inline_counts(distribution: &Distribution) -> String {
    distribution
        .iter()
        .map(|(key, count)| format!("{}: {}", key, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_options_split_comma_separated_hosts() {
        let options = StatsOptions {
            hosts: vec!["api.example.com, cdn.example.com".to_string(), "".to_string()],
            ..Default::default()
        };

        let filter = options.record_filter().unwrap();
        assert_eq!(filter.hosts.len(), 2);
    }

    #[test]
    fn test_options_reject_bad_status() {
        let options = StatsOptions {
            status: Some("abc".to_string()),
            ..Default::default()
        };

        assert!(options.record_filter().is_err());
    }
}
