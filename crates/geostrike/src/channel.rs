//! Typed envelope channel over any [`Connection`].
//!
//! The transport moves byte blobs; the protocol turns message batches into
//! blobs. `EnvelopeChannel` glues the two so callers only ever see
//! [`Msg`] values going out and [`WebSocketMessage`]s coming in.

use geostrike_protocol::{Codec, EnvelopeCodec, Msg, PackedCodec, WebSocketMessage};
use geostrike_transport::{Connection, ConnectionId, TransportError};

use crate::GeostrikeError;

/// Sends and receives whole envelopes over a connection.
///
/// Both ends of a socket wrap their connection in one of these; the
/// codec must match on both sides.
pub struct EnvelopeChannel<C, K = PackedCodec> {
    conn: C,
    codec: EnvelopeCodec<K>,
}

impl<C> EnvelopeChannel<C>
where
    C: Connection<Error = TransportError>,
{
    /// Wraps `conn` using the default packed wire format.
    pub fn new(conn: C) -> Self {
        Self::with_codec(conn, PackedCodec)
    }
}

impl<C, K> EnvelopeChannel<C, K>
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    pub fn with_codec(conn: C, codec: K) -> Self {
        Self {
            conn,
            codec: EnvelopeCodec::new(codec),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// The codec this channel packs with.
    pub fn codec(&self) -> &EnvelopeCodec<K> {
        &self.codec
    }

    /// Packs `messages` into one envelope and sends it.
    pub async fn send(&self, messages: &[Msg]) -> Result<(), GeostrikeError> {
        let bytes = self.codec.pack(messages)?;
        self.send_packed(&bytes).await
    }

    /// Sends a single message as its own envelope.
    pub async fn send_one(&self, message: impl Into<Msg>) -> Result<(), GeostrikeError> {
        let bytes = self.codec.pack_one(&message.into())?;
        self.send_packed(&bytes).await
    }

    /// Sends bytes that were already packed with this channel's codec.
    ///
    /// Lets a relay pack once and fan the same bytes out to many peers.
    pub async fn send_packed(&self, bytes: &[u8]) -> Result<(), GeostrikeError> {
        self.conn.send(bytes).await?;
        tracing::trace!(conn = %self.conn.id(), bytes = bytes.len(), "sent envelope");
        Ok(())
    }

    /// Waits for the next envelope.
    ///
    /// Returns `Ok(None)` once the peer closes cleanly. A blob that fails
    /// to unpack is returned as [`GeostrikeError::Protocol`]; the channel
    /// stays usable and the caller decides whether to keep reading.
    pub async fn recv(&self) -> Result<Option<WebSocketMessage>, GeostrikeError> {
        let Some(bytes) = self.conn.recv().await? else {
            return Ok(None);
        };
        let envelope = self.codec.unpack(&bytes)?;
        Ok(Some(envelope))
    }

    pub async fn close(&self) -> Result<(), GeostrikeError> {
        self.conn.close().await?;
        Ok(())
    }
}
