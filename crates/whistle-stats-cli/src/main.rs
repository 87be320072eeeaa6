use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use whistle_stats_cli::OutputFormat;
use whistle_stats_cli::commands;
use whistle_stats_cli::commands::stats::StatsOptions;
use whistle_stats_core::analysis::DEFAULT_TOP_DOMAINS;

#[derive(Parser)]
#[command(name = "whistle-stats")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Traffic statistics for whistle proxy captures",
    long_about = "whistle-stats reads a traffic dump exported from the whistle proxy and reports \
                  per-domain volume and latency, status code, method and HTTP version \
                  distributions, payload size histograms and HTTP/2 adoption."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, json, table)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "pretty",
        env = "WHISTLE_STATS_FORMAT"
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute traffic statistics for a capture
    Stats {
        /// Capture JSON file (reads stdin when omitted)
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Save the report as JSON to this file instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Show status code and method breakdown for each top domain
        #[arg(short, long)]
        detailed: bool,

        /// Number of domains to rank
        #[arg(long, default_value_t = DEFAULT_TOP_DOMAINS, env = "WHISTLE_STATS_TOP")]
        top: usize,

        /// Only analyze hosts matching this pattern (repeatable, supports * and ?)
        #[arg(long = "host", value_name = "PATTERN")]
        hosts: Vec<String>,

        /// Only analyze responses with this status (404, 2xx, 500-599)
        #[arg(long, value_name = "PATTERN")]
        status: Option<String>,

        /// Only analyze requests with this method
        #[arg(long)]
        method: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for whistle-stats.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  bash:  whistle-stats completion --shell bash >> ~/.bashrc
  zsh:   whistle-stats completion --shell zsh > \"${fpath[1]}/_whistle-stats\"
  fish:  whistle-stats completion --shell fish > ~/.config/fish/completions/whistle-stats.fish")]
    Completion {
        /// Shell to generate the script for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    // Execute the command
    match cli.command {
        Commands::Stats {
            file,
            output,
            detailed,
            top,
            hosts,
            status,
            method,
        } => {
            let options = StatsOptions {
                top,
                detailed,
                hosts,
                status,
                method,
            };
            commands::stats::execute(file.as_deref(), output.as_deref(), &options, cli.format)
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("whistle_stats=debug")
        } else {
            EnvFilter::new("whistle_stats=warn")
        }
    });

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
