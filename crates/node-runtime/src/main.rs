//! # Hush Network Node
//!
//! Entry point: load configuration, initialize telemetry, build the
//! node, run genesis-or-resume, then block until shutdown.

use anyhow::Result;
use node_runtime::{Node, NodeConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry_config = hn_telemetry::TelemetryConfig::from_env();
    let _telemetry = hn_telemetry::init_telemetry(telemetry_config)?;

    info!("starting hush network node");

    let config = NodeConfig::from_env()?;
    let validator_keypair = config.validator_keypair()?;
    let node = Node::build(&config, validator_keypair)?;

    node.start().await?;
    info!("node is running, block interval {}ms", config.blockchain.block_interval_ms);

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}
