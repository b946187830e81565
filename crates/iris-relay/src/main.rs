//! IRIS relay
//!
//! - WebSocket endpoint (default `ws://0.0.0.0:8080/`)
//! - Every frame from one peer is forwarded verbatim to all other peers
//! - One tracing span per peer
//! - Heartbeat ping + idle timeout

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use iris_core::error::Result;
use iris_relay::{app_state::AppState, config, server};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "iris-relay failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::var(config::CONFIG_ENV).unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.into());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.relay.listen_addr()?;

    let state = AppState::new(cfg)?;
    let listener = server::bind(listen).await?;

    tracing::info!(%listen, path = %state.cfg().relay.path, "iris-relay starting");
    server::serve(listener, state, server::shutdown_signal()).await
}
