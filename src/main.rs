//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl site crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config};
use ripple_crawl::output::{csv_output_path, print_statistics, CsvSink};
use ripple_crawl::url::normalize_seed;
use ripple_crawl::CrawlCoordinator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a same-site web crawler
///
/// Ripple-Crawl fetches every page of one site reachable from a root URL,
/// with a bounded number of requests in flight, and writes the HTTP status
/// of each response to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A bounded-concurrency same-site crawler", long_about = None)]
struct Cli {
    /// Root URL to start crawling from
    #[arg(short = 'u', long = "root", value_name = "URL")]
    root: String,

    /// Output file name (".csv" is appended when it has no extension)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<String>,

    /// Number of concurrent fetch workers
    #[arg(short = 'c', long = "max-tasks", value_name = "N")]
    max_tasks: Option<usize>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let (root, sink) = open_output(&cli.root, &config)?;
    tracing::info!("Writing records to {}", sink.path().display());

    let coordinator = CrawlCoordinator::new(config, Arc::new(sink))?;

    let interrupt = coordinator.interrupt_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => interrupt.cancel(),
            Err(e) => tracing::warn!("failed to listen for ctrl-c: {}", e),
        }
    });

    let stats = coordinator
        .crawl(&root)
        .await
        .with_context(|| format!("crawl of {} failed", root))?;

    if stats.interrupted {
        println!("\nInterrupted\n");
    }
    print_statistics(&stats);

    Ok(())
}

/// Checks the root URL, then creates the output file
///
/// The root is checked first so a bad `-u` never truncates an existing file.
fn open_output(root: &str, config: &Config) -> anyhow::Result<(String, CsvSink)> {
    let root = normalize_seed(root).with_context(|| format!("invalid root URL {:?}", root))?;

    let output_path = csv_output_path(&config.output.file);
    let sink = CsvSink::create(&output_path)
        .with_context(|| format!("failed to open output file {}", output_path.display()))?;

    Ok((root.to_string(), sink))
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(file) = &cli.file {
        config.output.file = file.clone();
    }
    if let Some(max_tasks) = cli.max_tasks {
        config.crawler.max_tasks = max_tasks;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
