//! scratchcraft-server: MCP server for ScratchCraft
//!
//! Polls a ScratchCraft game server over HTTP and exposes its blocks and
//! cached state through the Model Context Protocol (MCP) over stdio.
//!
//! Usage: `scratchcraft-server [ADDRESS]`
//!
//! The address defaults to `SCRATCHCRAFT_ADDRESS` or `http://127.0.0.1:8088`.
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use scratchcraft_bridge::{BridgeConfig, ScratchCraftBridge};
use scratchcraft_server::ScratchCraftServer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the protocol
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = BridgeConfig::from_env().context("Invalid bridge configuration")?;

    // Parse command line arguments
    if let Some(address) = std::env::args().nth(1) {
        config.base_address = address.trim_end_matches('/').to_string();
    }

    info!(
        "Starting scratchcraft-server, game server: {}, poll every {:?}",
        config.base_address, config.poll_interval
    );

    let mut bridge = ScratchCraftBridge::with_config(config)?;
    bridge.start();

    let server = ScratchCraftServer::new(bridge);
    server.run_stdio().await?;

    Ok(())
}
