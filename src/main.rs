//! Command-line interface for tsdb-loadgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Text lines with the default comma separator
//! tsdb-loadgen populate file \
//!   --dataset dataset.yaml \
//!   --output points.txt
//!
//! # Length-prefixed point-protocol frames, overriding seed and metric
//! tsdb-loadgen populate file \
//!   --dataset dataset.yaml \
//!   --output points.bin \
//!   --encoding binary-framed \
//!   --seed 7 --metric water
//!
//! # Validate a dataset without generating anything
//! tsdb-loadgen populate stdout --dataset dataset.yaml --dry-run
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=info` to see progress and the run summary.

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tsdb_loadgen::loadtest::populate::run_populate;
use tsdb_loadgen::PopulateTarget;

#[derive(Parser)]
#[command(name = "tsdb-loadgen")]
#[command(about = "A tool for generating deterministic time-series load-test datasets")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic dataset into a file or stdout
    Populate {
        #[command(subcommand)]
        target: PopulateTarget,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize logging on stderr so the stdout target stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { target } => {
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());
            run_populate(target, cancel).await?;
        }
    }

    Ok(())
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl-C, stopping generation");
            cancel.cancel();
        }
    });
}
