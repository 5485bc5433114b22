//! Auction bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p auction-api
//! ```
//!
//! Configuration is loaded from environment variables (a `.env` file works).
//! The chat transport is external; without one the process still serves the
//! keep-alive endpoints and runs the cleanup sweeps.

use std::sync::Arc;

use tracing::{error, info};

use auction_common::{try_init_tracing, AppConfig, InstanceLock};
use auction_service::NullChatPort;

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Startup failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Pokemon auction bot...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    // Two bot processes polling the same token fight over updates; refuse to
    // start while another instance holds the lock.
    let _lock = InstanceLock::acquire(&config.storage.lock_path)?;

    info!(
        env = ?config.app.env,
        port = config.health.port,
        channel = %config.bot.auction_channel,
        admins = config.bot.bootstrap_admins.len(),
        "Configuration loaded"
    );

    auction_api::run(config, Arc::new(NullChatPort::new())).await?;
    Ok(())
}
