//! Codecs: turning envelopes into bytes and back.
//!
//! The wire format has two layers:
//!
//! ```text
//! logical:   { "messages": [ { "itemType": "...", ... }, ... ] }   (JSON text)
//! physical:  varint length prefix ++ UTF-8 bytes of that text      (postcard)
//! ```
//!
//! The logical layer keeps the format human-inspectable; the physical layer
//! frames it as compact binary for the socket. Both layers are behind the
//! [`Codec`] trait, so a debug build can swap [`PackedCodec`] for
//! [`JsonCodec`] and read envelopes straight off the wire.
//!
//! [`EnvelopeCodec`] adds the envelope semantics on top of a codec:
//! wrapping messages on the way out and classifying every element on the
//! way in.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::types::Finite;
use crate::{Msg, ProtocolError, WebSocketMessage};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so one codec can be shared by every connection
/// task. Codecs hold no mutable state.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` or `ProtocolError::Compact` if the
    /// value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the binary frame is corrupt or
    /// truncated, and `ProtocolError::Parse` if the text inside isn't JSON
    /// of the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// The logical layer alone: plain JSON text.
///
/// Useful for debugging and for peers that speak text frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Parse)
    }
}

// ---------------------------------------------------------------------------
// PackedCodec
// ---------------------------------------------------------------------------

/// JSON text framed by `postcard`: the default wire format.
///
/// Decoding is strict: bytes left over after the frame are rejected rather
/// than ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedCodec;

impl Codec for PackedCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        let text = serde_json::to_string(value).map_err(ProtocolError::Encode)?;
        postcard::to_allocvec(&text).map_err(ProtocolError::Compact)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        let (text, rest): (&str, &[u8]) =
            postcard::take_from_bytes(data).map_err(ProtocolError::Decode)?;
        if !rest.is_empty() {
            return Err(ProtocolError::Decode(
                postcard::Error::DeserializeBadEncoding,
            ));
        }
        serde_json::from_str(text).map_err(ProtocolError::Parse)
    }
}

// ---------------------------------------------------------------------------
// EnvelopeCodec
// ---------------------------------------------------------------------------

/// Borrowed envelope so packing a slice doesn't clone the messages.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    messages: &'a [Msg],
}

/// Packs message batches into envelopes and unpacks them again.
///
/// ## Example
///
/// ```rust
/// use geostrike_protocol::{EnvelopeCodec, GeoLocation, Msg, PackedCodec};
///
/// let codec = EnvelopeCodec::new(PackedCodec);
///
/// let bytes = codec.pack(&[GeoLocation::new(40.0, -73.0).into()]).unwrap();
/// let envelope = codec.unpack(&bytes).unwrap();
///
/// assert_eq!(envelope.messages, vec![Msg::from(GeoLocation::new(40.0, -73.0))]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec<C = PackedCodec> {
    codec: C,
}

impl<C: Codec> EnvelopeCodec<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Wraps `messages` in an envelope and encodes it. The empty batch is
    /// valid.
    ///
    /// # Errors
    /// [`ProtocolError::NonFiniteNumber`] if any message holds NaN or an
    /// infinity; nothing is encoded in that case.
    pub fn pack(&self, messages: &[Msg]) -> Result<Vec<u8>, ProtocolError> {
        for msg in messages {
            if let Some(field) = msg.non_finite_field() {
                return Err(ProtocolError::NonFiniteNumber {
                    item_type: msg.item_type().as_str(),
                    field,
                });
            }
        }
        let bytes = self.codec.encode(&EnvelopeRef { messages })?;
        tracing::trace!(messages = messages.len(), bytes = bytes.len(), "packed envelope");
        Ok(bytes)
    }

    /// Same as `pack(&[message])`.
    pub fn pack_one(&self, message: &Msg) -> Result<Vec<u8>, ProtocolError> {
        self.pack(std::slice::from_ref(message))
    }

    /// Decodes an envelope and classifies every message, in order.
    ///
    /// # Errors
    /// Fails as a whole if the frame is corrupt, the structure isn't an
    /// envelope, or any single element can't be classified.
    pub fn unpack(&self, data: &[u8]) -> Result<WebSocketMessage, ProtocolError> {
        let value: Value = self.codec.decode(data)?;
        let envelope = WebSocketMessage::from_value(value)?;
        tracing::trace!(messages = envelope.len(), bytes = data.len(), "unpacked envelope");
        Ok(envelope)
    }
}

/// Packs `messages` with the default [`PackedCodec`].
pub fn pack(messages: &[Msg]) -> Result<Vec<u8>, ProtocolError> {
    EnvelopeCodec::new(PackedCodec).pack(messages)
}

/// Packs a single message with the default [`PackedCodec`].
pub fn pack_one(message: &Msg) -> Result<Vec<u8>, ProtocolError> {
    EnvelopeCodec::new(PackedCodec).pack_one(message)
}

/// Unpacks bytes produced by [`pack`] or [`pack_one`].
pub fn unpack(data: &[u8]) -> Result<WebSocketMessage, ProtocolError> {
    EnvelopeCodec::new(PackedCodec).unpack(data)
}
