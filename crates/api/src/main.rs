//! Genesis Telemetry Service - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Genesis Telemetry Service v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load()?;
    run_server(config).await?;

    Ok(())
}
