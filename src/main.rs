use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use podshelf::feed::Fetcher;
use podshelf::{pipeline, Config, LogSink};

#[derive(Parser, Debug)]
#[command(name = "podshelf", about = "Ingest configured podcast feeds into a normalized catalogue")]
struct Args {
    /// Path to the TOML config file listing podcast sources
    #[arg(long, short, value_name = "FILE", default_value = "podshelf.toml")]
    config: PathBuf,

    /// Override the log directory from the config file
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The log file location comes from the config, so config loading
    // runs under a scoped console-only subscriber; the full layered
    // subscriber takes over once the log directory is known.
    let config = {
        let console = tracing_subscriber::fmt().with_env_filter(env_filter()).finish();
        tracing::subscriber::with_default(console, || Config::load(&args.config))
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("podshelf needs a config file with at least one source, e.g.:");
            eprintln!();
            eprintln!("  [[sources]]");
            eprintln!("  name = \"Tech Weekly\"");
            eprintln!("  url = \"https://techweekly.example/feed.xml\"");
            std::process::exit(1);
        }
    };

    let log_dir = args.log_dir.unwrap_or_else(|| config.log_dir.clone());
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    // One log file per calendar day, alongside console output.
    let log_path = log_dir.join(format!("{}-podshelf.log", Utc::now().format("%Y-%m-%d")));
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    // Stop flag for the orchestrator: Ctrl-C requests a halt, honored
    // between sources so an in-flight fetch finishes on its own terms.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, finishing current source then stopping");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let fetcher = Fetcher::new(reqwest::Client::new(), config.fetch_timeout());
    let mut sink = LogSink;

    tracing::info!(sources = config.sources.len(), "Starting ingestion batch");
    let outcomes = pipeline::run_batch(&fetcher, &config.sources, &mut sink, &stop).await;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;
    tracing::info!(succeeded, failed, "Batch complete");
    println!(
        "Processed {} source(s): {} succeeded, {} failed",
        outcomes.len(),
        succeeded,
        failed
    );

    Ok(())
}
