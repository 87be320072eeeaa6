//! Command implementations behind the `whistle-stats` binary.

use clap::ValueEnum;

pub mod commands;

/// How a statistics report is written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled sections for a terminal
    Pretty,
    /// The full report as pretty-printed JSON
    Json,
    /// CSV-style `Metric,Value` rows and per-section tables
    Table,
}

impl OutputFormat {
    /// Name used by `--format` and `WHISTLE_STATS_FORMAT`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}
