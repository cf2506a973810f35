//! # Geostrike
//!
//! Wire protocol, transport and relay for a real-time location-based game.
//!
//! Clients and servers exchange batches of typed messages ([`Msg`](protocol::Msg)) packed
//! into a single binary envelope. This crate ties the layers together:
//! transport → envelope codec → typed messages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geostrike::prelude::*;
//!
//! # async fn demo() -> Result<(), GeostrikeError> {
//! let conn = WebSocketConnection::connect("ws://127.0.0.1:9000").await?;
//! let channel = EnvelopeChannel::new(conn);
//!
//! let batch: Vec<Msg> = vec![GeoLocation::new(40.7, -74.0).into(), FetchMissiles::new().into()];
//! channel.send(&batch).await?;
//! if let Some(envelope) = channel.recv().await? {
//!     for msg in envelope {
//!         println!("{}", msg.item_type());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod channel;
mod error;
pub mod relay;

pub use channel::EnvelopeChannel;
pub use error::GeostrikeError;

pub use geostrike_catalog as catalog;
pub use geostrike_protocol as protocol;
pub use geostrike_transport as transport;

/// Common imports for Geostrike clients and servers.
pub mod prelude {
    pub use crate::relay::{RelayConfig, RelayServer, RelayServerBuilder};
    pub use crate::{EnvelopeChannel, GeostrikeError};

    pub use geostrike_catalog::{Catalog, CatalogError, ItemDefinition, StaticCatalog};
    pub use geostrike_protocol::{
        BrandCategory, Codec, Echo, EnvelopeCodec, FetchMissiles, GeoLocation, ItemType,
        JsonCodec, Landmine, LandmineType, LocationUpdate, Loot, Missile, MissileGroup,
        MissileKey, MissileType, Msg, Other, PackedCodec, Player, PlayerLandmineHit,
        PlayerLandmineMiss, PlayerLootHit, PlayerMissileHit, PlayerMissileMiss, ProtocolError,
        Record, WeaponBrand, WebSocketMessage, classify, pack, pack_one, unpack,
    };
    pub use geostrike_transport::{
        Connection, ConnectionId, ShutdownHandle, Transport, TransportError, WebSocketConnection,
        WebSocketTransport,
    };
}
