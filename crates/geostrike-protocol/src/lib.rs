//! Wire protocol for Geostrike.
//!
//! This crate defines the messages that clients, servers and relays
//! exchange, and how a batch of them becomes bytes:
//!
//! - **Types** ([`Msg`] and its payloads, [`WebSocketMessage`]) — the
//!   closed set of variants, each stamped with its `itemType`.
//! - **Classification** ([`classify`]) — rebuilds a typed [`Msg`] from a
//!   generic JSON record by dispatching on `itemType`.
//! - **Codec** ([`pack`], [`pack_one`], [`unpack`], [`EnvelopeCodec`]) —
//!   JSON text as the logical form, postcard framing as the physical form.
//! - **Records** ([`Record`], `from_record` adapters) — the mapping from
//!   datastore rows to protocol variants.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Msg values → pack → bytes ══ transport ══ bytes → unpack → classify → Msg values
//! ```
//!
//! Everything here is a pure function over owned or borrowed inputs, so
//! `pack`, `unpack` and `classify` can be called from any number of
//! threads without synchronization.

mod brand;
mod classify;
mod codec;
mod error;
mod message;
mod records;
mod tag;
mod types;

pub use brand::{BrandCategory, LandmineType, MissileType, WeaponBrand};
pub use classify::classify;
pub use codec::{Codec, EnvelopeCodec, JsonCodec, PackedCodec, pack, pack_one, unpack};
pub use error::ProtocolError;
pub use message::{Msg, WebSocketMessage};
pub use records::Record;
pub use tag::{ItemType, Variant};
pub use types::{
    Echo, FetchMissiles, GeoLocation, Landmine, LocationUpdate, Loot, Missile, MissileGroup,
    MissileKey, Other, Player, PlayerLandmineHit, PlayerLandmineMiss, PlayerLootHit,
    PlayerMissileHit, PlayerMissileMiss,
};
