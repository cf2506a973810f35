//! Unified error type for Geostrike.

use geostrike_catalog::CatalogError;
use geostrike_protocol::ProtocolError;
use geostrike_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GeostrikeError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (pack, unpack, classification).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A catalog error (parse, duplicate brand).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
