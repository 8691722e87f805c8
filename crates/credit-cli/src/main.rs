//! Wallet credit scoring CLI
//!
//! Reads a JSON export of lending-protocol transactions, scores every wallet
//! in it and writes a `wallet,score` CSV.
//!
//! ```text
//! credit-score --input user-transactions.json --output wallet_scores.csv
//! ```

mod config;
mod error;
mod io;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::io::{load_transactions, write_csv, write_scores};

#[derive(Parser, Debug)]
#[command(name = "credit-score")]
#[command(about = "Score lending-protocol wallets based on transaction behavior")]
struct Args {
    /// Path to the transaction export (JSON array)
    #[arg(long)]
    input: PathBuf,

    /// Path for the scored wallets CSV
    #[arg(long)]
    output: PathBuf,

    /// Also write the per-wallet feature table to this CSV
    #[arg(long)]
    features: Option<PathBuf>,

    /// Configuration file (defaults to ./credit-score.* if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // stdout stays free for piping; logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("credit_score=info,credit_core=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = AppConfig::load(args.config.as_deref())
        .map_err(error::AppError::from)
        .context("Failed to load configuration")?;

    tracing::info!(
        tokens = config.tokens.len(),
        weights = ?config.scoring.weights,
        "Configuration loaded"
    );

    tracing::info!(input = %args.input.display(), "Loading data");
    let raw = load_transactions(&args.input)
        .with_context(|| format!("Failed to read transactions from {}", args.input.display()))?;

    // Nothing is written unless the whole batch scores
    let output = config.pipeline().run(&raw)?;

    tracing::info!(output = %args.output.display(), wallets = output.scores.len(), "Writing scores");
    write_scores(&args.output, &output.scores)
        .with_context(|| format!("Failed to write scores to {}", args.output.display()))?;

    if let Some(path) = &args.features {
        tracing::info!(path = %path.display(), "Writing feature table");
        write_csv(path, &output.features)
            .with_context(|| format!("Failed to write features to {}", path.display()))?;
    }

    tracing::info!("Done");
    Ok(())
}
