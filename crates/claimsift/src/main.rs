mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use claimsift_core::{AzureChatClient, Config, TestCasePipeline};

use crate::cli::Cli;

const DEFAULT_FILTER: &str = "claimsift=info,claimsift_core=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Configuration error")?;
    if let Some(path) = cli.pdf_path {
        config = config.with_pdf_path(path);
    }
    if let Some(path) = cli.output_path {
        config = config.with_output_path(path);
    }
    config.validate().context("Configuration error")?;

    let client = AzureChatClient::new(&config.llm)?;
    let pipeline = TestCasePipeline::new(Box::new(client), &config.chunking)?;

    let report = pipeline
        .run(&config.paths.pdf_path, &config.paths.output_path)
        .await?;

    eprintln!(
        "Extracted {} test cases from {} chunks ({} failed)",
        report.records, report.chunks_total, report.chunks_failed
    );
    eprintln!("Results saved to: {}", report.output_path.display());

    Ok(())
}
