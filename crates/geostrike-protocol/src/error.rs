//! Error types for the protocol layer.
//!
//! Every failure in this crate is surfaced to the caller as a
//! [`ProtocolError`]. Nothing is recovered locally: a bad element inside an
//! envelope fails the whole `unpack` call, and a persisted record with a
//! missing column fails the whole adapter call.

use crate::BrandCategory;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a value to its JSON text form failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Wrapping the JSON text in the binary frame failed.
    #[error("binary compaction failed: {0}")]
    Compact(#[source] postcard::Error),

    /// A message holds NaN or an infinity, which JSON can't carry.
    #[error("{item_type} field {field:?} is not a finite number")]
    NonFiniteNumber {
        item_type: &'static str,
        field: &'static str,
    },

    /// The byte blob is not a valid binary frame (corrupt or truncated).
    #[error("decode failed: {0}")]
    Decode(#[source] postcard::Error),

    /// The frame decoded, but its text is not valid JSON.
    #[error("envelope text is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The decoded structure is not an envelope.
    ///
    /// Raised when the top-level value is not an object or has no
    /// `messages` array.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A record reached classification without a string `itemType`.
    #[error("record has no itemType discriminant")]
    MissingItemType,

    /// The `itemType` is outside the closed variant set.
    #[error("unknown message variant: {0:?}")]
    UnknownVariant(String),

    /// The tag was recognised but the payload doesn't match the variant's
    /// shape (missing field, wrong JSON type, mismatched nested tag).
    #[error("invalid {item_type} payload: {source}")]
    InvalidPayload {
        item_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted record lacks a column the adapter requires.
    #[error("{record} record is missing field {field:?}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// A persisted record has the column, but with the wrong JSON type.
    #[error("{record} record field {field:?} is not {expected}")]
    InvalidField {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// A weapon brand was used where the other category is required,
    /// e.g. `Landmine2` as a missile type.
    #[error("brand {brand} is a {actual} brand, expected {expected}")]
    BrandMismatch {
        brand: &'static str,
        expected: BrandCategory,
        actual: BrandCategory,
    },
}
