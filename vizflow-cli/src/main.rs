//! # Vizflow CLI
//!
//! Command-line interface for the vizflow pipeline.
//!
//! Usage:
//!   vizflow --data <path> [--output <dir>]
//!
//! Examples:
//!   vizflow --data sales.csv
//!   vizflow --data survey.xlsx --output charts
//!
//! Provider settings come from the environment (a `.env` file is loaded
//! when present): `VIZFLOW_API_KEY`, `VIZFLOW_BASE_URL`, `VIZFLOW_MODEL`.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vizflow::prelude::*;

#[derive(Parser)]
#[command(name = "vizflow")]
#[command(author, version, about = "Vizflow - AI-driven data visualization pipeline")]
struct Cli {
    /// Path to your dataset (CSV, Excel, or JSON)
    #[arg(long)]
    data: PathBuf,

    /// Directory generated charts are written into
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let model = std::env::var("VIZFLOW_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
    let config = PipelineConfig {
        data_path: cli.data,
        output_dir: cli.output,
        model,
    };
    let factory = Arc::new(ProviderAgentFactory::new(ProviderConfig::from_env()));
    let pipeline = Pipeline::new(config, factory);

    let mut sink = StdoutSink;
    let report = pipeline.run(&mut sink).await?;

    let (rows, cols) = report.final_shape;
    println!("\nPipeline complete. Final dataset shape: ({rows}, {cols})");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vizflow=warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("[ERROR] Pipeline failed: {e}");
    }
}
