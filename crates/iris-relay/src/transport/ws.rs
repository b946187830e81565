//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS on the configured path
//! - Unicast the welcome `log`, then register the peer
//! - Per-connection loop: write own queue, read and fan out, keepalive
//! - Idle: no inbound frame and no data frame written for `idle_timeout_ms`
//! - Unregister on any exit path (guard drop)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, ConnectInfo, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use iris_core::error::{IrisError, Result};
use iris_core::protocol::Envelope;

use crate::app_state::AppState;
use crate::relay::{ConnId, ConnState, Peer};
use crate::transport::codec::{decode, Inbound};

/// Upper bound on the close handshake once a session is over.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    let ws = match app.cfg().relay.max_message_bytes {
        Some(max) => ws.max_message_size(max).max_frame_size(max),
        None => ws,
    };

    ws.on_upgrade(move |socket| async move {
        let id = app.relay().registry().next_id();
        let span = tracing::info_span!("peer", %id, %addr);
        async move {
            if let Err(e) = run_session(app, id, addr, socket).await {
                tracing::warn!(error = %e, "session aborted");
            }
        }
        .instrument(span)
        .await
    })
}

// --------------------
// Core session loop
// --------------------
async fn run_session(app: AppState, id: ConnId, addr: SocketAddr, socket: WebSocket) -> Result<()> {
    let cfg = &app.cfg().relay;
    let relay = app.relay();

    // ---- outbound queue, welcome first so it precedes any relayed traffic
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(cfg.outbound_queue);
    let welcome = Envelope::log(cfg.welcome.as_str()).encode()?;
    out_tx
        .try_send(Message::Text(welcome))
        .map_err(|_| IrisError::Internal("outbound queue rejected welcome".into()))?;

    let peer = Arc::new(Peer::new(id, addr, out_tx));
    let guard = relay.attach(Arc::clone(&peer));
    tracing::info!("peer connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- timers
    let ping_every = Duration::from_millis(cfg.ping_interval_ms);
    let idle_timeout = Duration::from_millis(cfg.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    let reason = loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break "queue_closed" };
                // Keepalive frames do not prove the peer is consuming data.
                let is_data = matches!(m, Message::Text(_) | Message::Binary(_));
                tokio::select! {
                    res = tokio::time::timeout(idle_timeout, ws_tx.send(m)) => match res {
                        Ok(Ok(())) => {
                            if is_data {
                                last_activity = Instant::now();
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::debug!(error = %e, "socket write failed");
                            break "send_failed";
                        }
                        Err(_) => break "send_timeout",
                    },
                    _ = peer.close_requested() => break "closed_by_relay",
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break "eof" };
                let msg = match incoming {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = %e, "socket read failed");
                        break "transport_error";
                    }
                };
                last_activity = Instant::now();

                match decode(msg) {
                    Inbound::Relay(frame) => {
                        let round = relay.fan_out(id, &frame);
                        tracing::trace!(bytes = frame.len(), ?round, "relayed");
                    }
                    // The websocket layer queues the Pong reply itself.
                    Inbound::Ping | Inbound::Pong => {}
                    Inbound::Close => break "peer_close",
                }
            }

            // relay asked us to go (send failure / slow peer)
            _ = peer.close_requested() => break "closed_by_relay",

            _ = ping_tick.tick() => {
                if peer.tx.try_send(Message::Ping(Vec::new())).is_err() {
                    app.metrics().pings_dropped.inc(&[]);
                    tracing::debug!("outbound queue full, keepalive ping skipped");
                }
            }

            _ = tokio::time::sleep_until(last_activity + idle_timeout) => break "idle_timeout",
        }
    };

    // Out of the fan-out set before the close handshake is awaited.
    peer.advance(ConnState::Closing);
    drop(guard);
    let _ = tokio::time::timeout(CLOSE_GRACE, ws_tx.close()).await;

    tracing::info!(reason, "peer disconnected");
    Ok(())
}
