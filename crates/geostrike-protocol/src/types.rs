//! Payload types for Geostrike's wire format.
//!
//! Each struct here is one variant of the protocol. Values are built with
//! `new`, which stamps the variant's `itemType`; the tag field is private,
//! so a value can't be assembled with the wrong discriminant.
//!
//! On the wire every struct is a flat JSON object: `itemType` first, then
//! its fields in camelCase. Nested protocol values keep their own
//! `itemType`:
//!
//! ```text
//! { "itemType": "Player",
//!   "username": "alice",
//!   "location": { "itemType": "GeoLocation", "latitude": 40.0, "longitude": -73.0 },
//!   "updatedAt": "2024-05-01T12:00:00Z" }
//! ```
//!
//! All numbers are `f64` except ids, which are integers. Timestamps are
//! opaque strings; this layer doesn't parse them.

use serde::{Deserialize, Serialize};

use crate::tag::{ItemTag, Variant};
use crate::{ItemType, Msg};

/// Implements [`Variant`], an `item_type()` accessor, and `From<T> for Msg`
/// for a payload struct whose name matches its tag.
macro_rules! variant {
    ($($ty:ident),* $(,)?) => {$(
        impl Variant for $ty {
            const ITEM_TYPE: ItemType = ItemType::$ty;
        }

        impl $ty {
            /// This variant's discriminant.
            pub fn item_type(&self) -> ItemType {
                ItemType::$ty
            }
        }

        impl From<$ty> for Msg {
            fn from(value: $ty) -> Self {
                Msg::$ty(value)
            }
        }
    )*};
}

variant! {
    Echo,
    GeoLocation,
    Player,
    LocationUpdate,
    Missile,
    Landmine,
    Loot,
    Other,
    PlayerMissileHit,
    PlayerLandmineHit,
    PlayerLootHit,
    PlayerMissileMiss,
    PlayerLandmineMiss,
    MissileGroup,
    FetchMissiles,
}

// ---------------------------------------------------------------------------
// Leaf values
// ---------------------------------------------------------------------------

/// Free text bounced off a relay. Used for debugging and liveness checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Echo {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Echo>,
    pub text: String,
}

impl Echo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            item_type: ItemTag::new(),
            text: text.into(),
        }
    }
}

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<GeoLocation>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            item_type: ItemTag::new(),
            latitude,
            longitude,
        }
    }
}

/// A connected player and where they were last seen.
///
/// `username` identifies the player; uniqueness is the session layer's
/// job, not this crate's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Player>,
    pub username: String,
    pub location: GeoLocation,
    pub updated_at: String,
}

impl Player {
    pub fn new(
        username: impl Into<String>,
        location: GeoLocation,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            item_type: ItemTag::new(),
            username: username.into(),
            location,
            updated_at: updated_at.into(),
        }
    }
}

/// A player reporting a new position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<LocationUpdate>,
    pub user: Player,
    pub location: GeoLocation,
}

impl LocationUpdate {
    pub fn new(user: Player, location: GeoLocation) -> Self {
        Self {
            item_type: ItemTag::new(),
            user,
            location,
        }
    }
}

// ---------------------------------------------------------------------------
// Weapons and hazards
// ---------------------------------------------------------------------------

/// Identity of a missile as consumers must track it.
///
/// `missileId` is only unique per sender, so two players can both have
/// missile `1` in flight. Key missile state by this pair, never by the id
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MissileKey {
    pub sent_by_username: String,
    pub missile_id: i64,
}

/// A missile, in flight or landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Missile {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Missile>,
    /// Catalog brand name, e.g. `"Amplifier"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Lifecycle state, e.g. `"in-flight"` or `"landed"`.
    pub status: String,
    pub destination: GeoLocation,
    pub current_location: GeoLocation,
    /// Unique only among the sender's missiles. See [`MissileKey`].
    pub missile_id: i64,
    pub damage: f64,
    pub radius: f64,
    pub sent_by_username: String,
    pub time_sent: String,
    pub eta_time_to_impact: String,
}

impl Missile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: impl Into<String>,
        status: impl Into<String>,
        destination: GeoLocation,
        current_location: GeoLocation,
        missile_id: i64,
        damage: f64,
        radius: f64,
        sent_by_username: impl Into<String>,
        time_sent: impl Into<String>,
        eta_time_to_impact: impl Into<String>,
    ) -> Self {
        Self {
            item_type: ItemTag::new(),
            kind: kind.into(),
            status: status.into(),
            destination,
            current_location,
            missile_id,
            damage,
            radius,
            sent_by_username: sent_by_username.into(),
            time_sent: time_sent.into(),
            eta_time_to_impact: eta_time_to_impact.into(),
        }
    }

    /// The `(sender, id)` pair that identifies this missile.
    pub fn key(&self) -> MissileKey {
        MissileKey {
            sent_by_username: self.sent_by_username.clone(),
            missile_id: self.missile_id,
        }
    }
}

/// A landmine placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmine {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Landmine>,
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub damage: f64,
    pub location: GeoLocation,
    pub placed_by: String,
    pub placed_time: String,
    pub eta_expire_time: String,
}

impl Landmine {
    pub fn new(
        id: i64,
        kind: impl Into<String>,
        damage: f64,
        location: GeoLocation,
        placed_by: impl Into<String>,
        placed_time: impl Into<String>,
        eta_expire_time: impl Into<String>,
    ) -> Self {
        Self {
            item_type: ItemTag::new(),
            id,
            kind: kind.into(),
            damage,
            location,
            placed_by: placed_by.into(),
            placed_time: placed_time.into(),
            eta_expire_time: eta_expire_time.into(),
        }
    }
}

/// A pickup lying on the map until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loot {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Loot>,
    pub id: i64,
    pub location: GeoLocation,
    pub rarity: String,
    pub expire_time: String,
}

impl Loot {
    pub fn new(
        id: i64,
        location: GeoLocation,
        rarity: impl Into<String>,
        expire_time: impl Into<String>,
    ) -> Self {
        Self {
            item_type: ItemTag::new(),
            id,
            location,
            rarity: rarity.into(),
            expire_time: expire_time.into(),
        }
    }
}

/// Any other timed, geolocated entity with an area of effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Other {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<Other>,
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub radius: f64,
    pub location: GeoLocation,
    pub expire_time: String,
}

impl Other {
    pub fn new(
        id: i64,
        kind: impl Into<String>,
        radius: f64,
        location: GeoLocation,
        expire_time: impl Into<String>,
    ) -> Self {
        Self {
            item_type: ItemTag::new(),
            id,
            kind: kind.into(),
            radius,
            location,
            expire_time: expire_time.into(),
        }
    }
}

/// A batch of missiles, e.g. everything a player has in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissileGroup {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<MissileGroup>,
    pub missiles: Vec<Missile>,
}

impl MissileGroup {
    pub fn new(missiles: Vec<Missile>) -> Self {
        Self {
            item_type: ItemTag::new(),
            missiles,
        }
    }
}

/// Client → Server: "send me my missiles again".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMissiles {
    #[serde(rename = "itemType", default)]
    item_type: ItemTag<FetchMissiles>,
}

impl FetchMissiles {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Finite numbers
// ---------------------------------------------------------------------------

/// Finds `f64` fields holding NaN or an infinity.
///
/// JSON has no spelling for those values (`serde_json` writes `null`), so
/// a message carrying one would pack into bytes that can't be unpacked.
pub(crate) trait Finite {
    /// Name of the first non-finite field, nested values included.
    fn non_finite_field(&self) -> Option<&'static str>;
}

fn finite(value: f64, field: &'static str) -> Option<&'static str> {
    (!value.is_finite()).then_some(field)
}

impl Finite for GeoLocation {
    fn non_finite_field(&self) -> Option<&'static str> {
        finite(self.latitude, "latitude").or_else(|| finite(self.longitude, "longitude"))
    }
}

impl Finite for Player {
    fn non_finite_field(&self) -> Option<&'static str> {
        self.location.non_finite_field()
    }
}

impl Finite for LocationUpdate {
    fn non_finite_field(&self) -> Option<&'static str> {
        self.user
            .non_finite_field()
            .or_else(|| self.location.non_finite_field())
    }
}

impl Finite for Missile {
    fn non_finite_field(&self) -> Option<&'static str> {
        self.destination
            .non_finite_field()
            .or_else(|| self.current_location.non_finite_field())
            .or_else(|| finite(self.damage, "damage"))
            .or_else(|| finite(self.radius, "radius"))
    }
}

impl Finite for Landmine {
    fn non_finite_field(&self) -> Option<&'static str> {
        finite(self.damage, "damage").or_else(|| self.location.non_finite_field())
    }
}

impl Finite for Loot {
    fn non_finite_field(&self) -> Option<&'static str> {
        self.location.non_finite_field()
    }
}

impl Finite for Other {
    fn non_finite_field(&self) -> Option<&'static str> {
        finite(self.radius, "radius").or_else(|| self.location.non_finite_field())
    }
}

impl Finite for MissileGroup {
    fn non_finite_field(&self) -> Option<&'static str> {
        self.missiles.iter().find_map(Finite::non_finite_field)
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Defines a notification pairing a [`Player`] with the weapon or hazard
/// involved. Notifications carry no logic; they only keep both ends'
/// view of the world in sync.
macro_rules! notification {
    ($(#[$doc:meta])* $name:ident { $field:ident: $ty:ident }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(rename = "itemType", default)]
            item_type: ItemTag<$name>,
            pub player: Player,
            pub $field: $ty,
        }

        impl $name {
            pub fn new(player: Player, $field: $ty) -> Self {
                Self {
                    item_type: ItemTag::new(),
                    player,
                    $field,
                }
            }
        }

        impl Finite for $name {
            fn non_finite_field(&self) -> Option<&'static str> {
                self.player
                    .non_finite_field()
                    .or_else(|| self.$field.non_finite_field())
            }
        }
    };
}

notification! {
    /// Server → both players: a missile hit `player`.
    PlayerMissileHit { missile: Missile }
}

notification! {
    /// Server → both players: `player` stepped on a landmine.
    PlayerLandmineHit { landmine: Landmine }
}

notification! {
    /// Server → player: `player` picked up loot.
    PlayerLootHit { loot: Loot }
}

notification! {
    /// Server → shooter only: the missile landed without hitting anyone.
    PlayerMissileMiss { missile: Missile }
}

notification! {
    /// Server → owner only: the landmine expired without a victim.
    PlayerLandmineMiss { landmine: Landmine }
}
