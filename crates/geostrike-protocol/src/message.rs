//! The message union and the envelope that carries it.

use serde::Serialize;

use crate::{
    Echo, FetchMissiles, GeoLocation, ItemType, Landmine, LocationUpdate, Loot, Missile,
    MissileGroup, Other, Player, PlayerLandmineHit, PlayerLandmineMiss, PlayerLootHit,
    PlayerMissileHit, PlayerMissileMiss, WeaponBrand,
};
use crate::types::Finite;

/// One message of the protocol: the closed set of variants.
///
/// Serialization is `untagged` because every payload already writes its own
/// `itemType`. Decoding goes the other way through [`classify`], which
/// reads the tag first and then builds the matching variant.
///
/// [`classify`]: crate::classify
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Msg {
    Echo(Echo),
    GeoLocation(GeoLocation),
    Player(Player),
    LocationUpdate(LocationUpdate),
    Missile(Missile),
    Landmine(Landmine),
    Loot(Loot),
    Other(Other),
    PlayerMissileHit(PlayerMissileHit),
    PlayerLandmineHit(PlayerLandmineHit),
    PlayerLootHit(PlayerLootHit),
    PlayerMissileMiss(PlayerMissileMiss),
    PlayerLandmineMiss(PlayerLandmineMiss),
    MissileGroup(MissileGroup),
    /// `Missile1` … `Landmine3`.
    Brand(WeaponBrand),
    FetchMissiles(FetchMissiles),
}

impl Msg {
    /// The discriminant this message is sent with.
    pub fn item_type(&self) -> ItemType {
        match self {
            Msg::Echo(m) => m.item_type(),
            Msg::GeoLocation(m) => m.item_type(),
            Msg::Player(m) => m.item_type(),
            Msg::LocationUpdate(m) => m.item_type(),
            Msg::Missile(m) => m.item_type(),
            Msg::Landmine(m) => m.item_type(),
            Msg::Loot(m) => m.item_type(),
            Msg::Other(m) => m.item_type(),
            Msg::PlayerMissileHit(m) => m.item_type(),
            Msg::PlayerLandmineHit(m) => m.item_type(),
            Msg::PlayerLootHit(m) => m.item_type(),
            Msg::PlayerMissileMiss(m) => m.item_type(),
            Msg::PlayerLandmineMiss(m) => m.item_type(),
            Msg::MissileGroup(m) => m.item_type(),
            Msg::Brand(brand) => brand.item_type(),
            Msg::FetchMissiles(m) => m.item_type(),
        }
    }
}

impl Finite for Msg {
    fn non_finite_field(&self) -> Option<&'static str> {
        match self {
            Msg::GeoLocation(m) => m.non_finite_field(),
            Msg::Player(m) => m.non_finite_field(),
            Msg::LocationUpdate(m) => m.non_finite_field(),
            Msg::Missile(m) => m.non_finite_field(),
            Msg::Landmine(m) => m.non_finite_field(),
            Msg::Loot(m) => m.non_finite_field(),
            Msg::Other(m) => m.non_finite_field(),
            Msg::PlayerMissileHit(m) => m.non_finite_field(),
            Msg::PlayerLandmineHit(m) => m.non_finite_field(),
            Msg::PlayerLootHit(m) => m.non_finite_field(),
            Msg::PlayerMissileMiss(m) => m.non_finite_field(),
            Msg::PlayerLandmineMiss(m) => m.non_finite_field(),
            Msg::MissileGroup(m) => m.non_finite_field(),
            Msg::Echo(_) | Msg::Brand(_) | Msg::FetchMissiles(_) => None,
        }
    }
}

impl From<WeaponBrand> for Msg {
    fn from(brand: WeaponBrand) -> Self {
        Msg::Brand(brand)
    }
}

/// The unit of transmission: an ordered batch of messages.
///
/// Order is meaningful (a location update followed by the hit it caused)
/// and is preserved end to end. An empty batch is valid and acts as a
/// heartbeat.
///
/// ```text
/// { "messages": [ { "itemType": "...", ... }, ... ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebSocketMessage {
    pub messages: Vec<Msg>,
}

impl WebSocketMessage {
    pub fn new(messages: Vec<Msg>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn into_messages(self) -> Vec<Msg> {
        self.messages
    }
}

impl From<Vec<Msg>> for WebSocketMessage {
    fn from(messages: Vec<Msg>) -> Self {
        Self::new(messages)
    }
}

impl IntoIterator for WebSocketMessage {
    type Item = Msg;
    type IntoIter = std::vec::IntoIter<Msg>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}
