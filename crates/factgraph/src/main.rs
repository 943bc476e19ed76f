//! Factgraph CLI binary.

use anyhow::Result;
use factgraph::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the factgraph CLI.
///
/// Logs go to stderr so the JSON report on stdout can be piped.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Example: RUST_LOG=factgraph=debug,factgraph_jsonl=trace factgraph stats
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("factgraph=info,factgraph_jsonl=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting factgraph CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Factgraph CLI completed successfully");
    Ok(())
}
