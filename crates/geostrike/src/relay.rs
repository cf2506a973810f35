//! Envelope relay: the server loop that fans envelopes out between peers.
//!
//! Every accepted socket becomes a peer. An envelope from one peer is
//! forwarded to every other peer; `Echo` messages inside it are also
//! bounced straight back to the sender. The relay never interprets game
//! state, it only needs to decode envelopes well enough to find the echoes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use geostrike_protocol::{Msg, WebSocketMessage};
use geostrike_transport::{
    ConnectionId, ShutdownHandle, Transport, TransportError, WebSocketConnection,
    WebSocketTransport,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{EnvelopeChannel, GeostrikeError};

/// Relay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Address to listen on, e.g. `0.0.0.0:9000`.
    pub bind_addr: String,
    /// A peer silent for this long is dropped.
    #[serde(with = "secs")]
    pub idle_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

type Peer = Arc<EnvelopeChannel<WebSocketConnection>>;

/// State shared by every peer task.
struct RelayState {
    peers: Mutex<HashMap<ConnectionId, Peer>>,
    idle_timeout: Duration,
}

impl RelayState {
    /// Snapshot of every peer except `sender`.
    async fn others(&self, sender: ConnectionId) -> Vec<Peer> {
        let peers = self.peers.lock().await;
        peers
            .iter()
            .filter(|(id, _)| **id != sender)
            .map(|(_, peer)| Arc::clone(peer))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a relay.
///
/// # Example
///
/// ```rust,ignore
/// let relay = RelayServer::builder().bind("0.0.0.0:9000").build().await?;
/// relay.run().await
/// ```
pub struct RelayServerBuilder {
    config: RelayConfig,
}

impl RelayServerBuilder {
    pub fn new() -> Self {
        Self {
            config: RelayConfig::default(),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener. The relay starts serving on [`RelayServer::run`].
    pub async fn build(self) -> Result<RelayServer, GeostrikeError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let state = Arc::new(RelayState {
            peers: Mutex::new(HashMap::new()),
            idle_timeout: self.config.idle_timeout,
        });
        Ok(RelayServer { transport, state })
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound relay. Call [`run()`](Self::run) to start accepting peers.
pub struct RelayServer {
    transport: WebSocketTransport,
    state: Arc<RelayState>,
}

impl RelayServer {
    pub fn builder() -> RelayServerBuilder {
        RelayServerBuilder::new()
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Stops [`run`](Self::run) from another task, e.g. on Ctrl-C.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.transport.shutdown_handle()
    }

    /// Runs the accept loop until shut down through a [`ShutdownHandle`].
    ///
    /// On shutdown every connected peer is closed before this returns.
    pub async fn run(mut self) -> Result<(), GeostrikeError> {
        tracing::info!("relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_peer(conn, state).await {
                            tracing::debug!(error = %e, "peer ended with error");
                        }
                    });
                }
                Err(TransportError::Shutdown) => break,
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }

        let peers: Vec<Peer> = self.state.peers.lock().await.values().cloned().collect();
        for peer in &peers {
            if let Err(e) = peer.close().await {
                tracing::debug!(id = %peer.id(), error = %e, "close failed");
            }
        }
        tracing::info!(peers = peers.len(), "relay stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-peer handler
// ---------------------------------------------------------------------------

/// Removes a peer from the table when its handler exits, panics included.
struct PeerGuard {
    id: ConnectionId,
    state: Arc<RelayState>,
}

impl Drop for PeerGuard {
    fn drop(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let id = self.id;
        let state = Arc::clone(&self.state);
        handle.spawn(async move {
            state.peers.lock().await.remove(&id);
            tracing::debug!(%id, "peer removed");
        });
    }
}

async fn handle_peer(
    conn: WebSocketConnection,
    state: Arc<RelayState>,
) -> Result<(), GeostrikeError> {
    let peer: Peer = Arc::new(EnvelopeChannel::new(conn));
    let id = peer.id();

    state.peers.lock().await.insert(id, Arc::clone(&peer));
    let _guard = PeerGuard {
        id,
        state: Arc::clone(&state),
    };
    tracing::info!(%id, "peer joined");

    loop {
        let envelope = match tokio::time::timeout(state.idle_timeout, peer.recv()).await {
            Ok(Ok(Some(envelope))) => envelope,
            Ok(Ok(None)) => {
                tracing::info!(%id, "peer closed cleanly");
                break;
            }
            Ok(Err(GeostrikeError::Protocol(e))) => {
                tracing::debug!(%id, error = %e, "failed to unpack envelope");
                continue;
            }
            Ok(Err(e)) => {
                tracing::debug!(%id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%id, "peer timed out");
                break;
            }
        };

        relay_envelope(&peer, &state, envelope).await?;
    }

    // _guard drops here and the peer leaves the table.
    Ok(())
}

/// Answers echoes to the sender and forwards the envelope to everyone else.
async fn relay_envelope(
    sender: &Peer,
    state: &RelayState,
    envelope: WebSocketMessage,
) -> Result<(), GeostrikeError> {
    let id = sender.id();

    let echoes: Vec<Msg> = envelope
        .messages
        .iter()
        .filter(|msg| matches!(msg, Msg::Echo(_)))
        .cloned()
        .collect();
    if !echoes.is_empty() {
        sender.send(&echoes).await?;
    }

    // Pack once, fan the same bytes out.
    let bytes = sender.codec().pack(&envelope.messages)?;
    let others = state.others(id).await;
    tracing::trace!(%id, messages = envelope.len(), peers = others.len(), "forwarding envelope");

    for peer in others {
        if let Err(e) = peer.send_packed(&bytes).await {
            tracing::debug!(from = %id, to = %peer.id(), error = %e, "forward failed");
        }
    }
    Ok(())
}
