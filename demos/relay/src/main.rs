//! Stand-alone envelope relay.
//!
//! ```text
//! geostrike-relay [BIND_ADDR]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use geostrike::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RelayConfig::default();
    if let Some(addr) = std::env::args().nth(1) {
        config.bind_addr = addr;
    }

    let relay = RelayServer::builder().config(config).build().await?;
    tracing::info!(addr = %relay.local_addr()?, "geostrike relay listening");

    let handle = relay.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            handle.shutdown();
        }
    });

    relay.run().await?;
    Ok(())
}
