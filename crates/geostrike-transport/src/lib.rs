//! Transport abstraction layer for Geostrike.
//!
//! Provides the [`Transport`] and [`Connection`] traits: a bidirectional
//! channel that moves opaque byte blobs (packed envelopes) between peers.
//! Clients, servers and relays all use the same [`Connection`] type.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{ShutdownHandle, WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Process-unique handle for one peer connection.
///
/// Shows up in log fields as `conn-<n>`; relays key their peer tables by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// The listening side: hands out one [`Connection`] per peer that dials in.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer.
    ///
    /// Fails once the transport has been shut down, including a call that
    /// is already waiting when the shutdown happens.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting peers. Established connections stay open; closing
    /// them is up to whoever owns them.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// One end of a peer link, carrying whole envelopes as byte blobs.
///
/// The same type serves accepted and dialled sockets. `send` and `recv`
/// may run at the same time from different tasks: a relay forwards to
/// peers whose own task is parked in `recv`.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one blob as one frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Waits for the next blob. `Ok(None)` means the peer closed cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts the closing handshake. Later `send`s fail.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;
}
