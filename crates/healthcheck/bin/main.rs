use clap::Parser;
use healthcheck::{Cli, HealthServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // origins only, RPC paths often carry API keys
    tracing::info!(
        "Starting healthcheck for node {} against {}",
        cli.node_url.origin().ascii_serialization(),
        cli.external_node_url.origin().ascii_serialization()
    );

    let checker = cli.checker()?;
    HealthServer::new(checker).serve(cli.listen).await?;

    Ok(())
}
