//! WCraaS Control main entry point
//!
//! This is the command-line interface for the crawl orchestrator.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wcraas_control::config::{load_config_with_hash, Config, LogLevel};
use wcraas_control::crawler::{parse_target, run_crawl, run_list_collections};

/// WCraaS Control: orchestrates crawling across platform workers
///
/// Discovery is delegated to workers over AMQP RPC while a shared Redis
/// instance keeps every address from being crawled twice. Connection
/// settings come from the environment (optionally a `.env` file) layered
/// over an optional TOML file.
#[derive(Parser, Debug)]
#[command(name = "wcraas-control")]
#[command(version)]
#[command(about = "Crawl orchestration for the WCraaS platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl everything reachable from TARGET
    Control {
        /// Entry point URL of the crawl
        target: String,
    },

    /// List the collections available at the storage service
    ListCollections,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) =
        load_config_with_hash(cli.config.as_deref()).context("Failed to load configuration")?;

    // Setup logging based on configured level and verbosity
    setup_logging(config.loglevel, cli.verbose, cli.quiet);
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);
    tracing::debug!("{:?}", config);

    match cli.command {
        Command::Control { target } => handle_crawl(&config, &target).await,
        Command::ListCollections => handle_list_collections(&config).await,
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(level: LogLevel, verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        let level = level.raised(verbose);
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("wcraas_control={},warn", level.as_filter()))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `control` command
async fn handle_crawl(config: &Config, target: &str) -> anyhow::Result<()> {
    let seed = parse_target(target)?;

    tracing::info!(
        "Starting crawl of {} (polling interval {}s)",
        seed,
        config.polling_interval
    );

    let result = tokio::select! {
        result = run_crawl(config, seed) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning crawl");
            anyhow::bail!("crawl interrupted");
        }
    };

    match result {
        Ok(report) => {
            let seconds = report
                .duration()
                .map(|d| d.num_milliseconds() as f64 / 1000.0)
                .unwrap_or_default();
            tracing::info!(
                "Crawl completed in {:.1}s: {} done, {} failed, {} enqueued, {} skipped",
                seconds,
                report.done,
                report.failed,
                report.enqueued,
                report.skipped
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the `list-collections` command
async fn handle_list_collections(config: &Config) -> anyhow::Result<()> {
    let collections = run_list_collections(config).await?;
    println!("{}", serde_json::to_string_pretty(&collections)?);
    Ok(())
}
