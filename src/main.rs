use anyhow::Result;
use ethix_site::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ethix_site=info".parse()?),
        )
        .init();

    info!("Starting Ethix content gateway");

    // Load configuration from environment
    let config = config::Config::from_env()?;

    server::run(config).await
}
