//! userd server binary.
//!
//! Exits non-zero if configuration is invalid, the store is unreachable at
//! startup, or the listen address cannot be bound.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
