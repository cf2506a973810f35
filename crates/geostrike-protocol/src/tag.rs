//! The `itemType` discriminant.
//!
//! Every record on the wire carries an `itemType` string. It is the sole
//! dispatch key when an envelope is decoded, so the set of tags is closed
//! and each tag belongs to exactly one variant.
//!
//! Two pieces live here:
//!
//! - [`ItemType`] — the closed enumeration of tags, used for dispatch.
//! - [`ItemTag`] — a zero-sized field stamped into every payload struct.
//!   It serializes as the struct's own tag and refuses to deserialize from
//!   any other tag, so nested values (the `GeoLocation` inside a `Missile`,
//!   the `Player` inside a hit notification) are tagged and checked too.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// ItemType
// ---------------------------------------------------------------------------

/// Generates [`ItemType`] from the list of tags. Each variant's name is its
/// wire string, so the two can never drift apart.
macro_rules! item_types {
    ($($tag:ident),* $(,)?) => {
        /// The closed set of `itemType` discriminants.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ItemType {
            $($tag,)*
        }

        impl ItemType {
            /// Every tag, in declaration order.
            pub const ALL: &'static [ItemType] = &[$(ItemType::$tag,)*];

            /// The exact string that appears in the `itemType` field.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(ItemType::$tag => stringify!($tag),)*
                }
            }
        }

        impl FromStr for ItemType {
            type Err = ProtocolError;

            fn from_str(tag: &str) -> Result<Self, Self::Err> {
                match tag {
                    $(stringify!($tag) => Ok(ItemType::$tag),)*
                    other => Err(ProtocolError::UnknownVariant(other.to_owned())),
                }
            }
        }
    };
}

item_types! {
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
    Missile1,
    Missile2,
    Missile3,
    Landmine1,
    Landmine2,
    Landmine3,
    FetchMissiles,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Variant + ItemTag
// ---------------------------------------------------------------------------

/// A payload struct with a fixed discriminant.
pub trait Variant {
    /// The tag stamped on every value of this type.
    const ITEM_TYPE: ItemType;
}

/// Zero-sized `itemType` field for a payload struct `T`.
///
/// `PhantomData<fn() -> T>` keeps the marker `Send + Sync` and free of
/// drop-check obligations regardless of `T`.
pub(crate) struct ItemTag<T>(PhantomData<fn() -> T>);

impl<T> ItemTag<T> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

// Manual impls: derives would put bounds on `T`, and `T` is the very struct
// that contains this field.

impl<T> Clone for ItemTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemTag<T> {}

impl<T> Default for ItemTag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for ItemTag<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for ItemTag<T> {}

impl<T: Variant> fmt::Debug for ItemTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::ITEM_TYPE.as_str())
    }
}

impl<T: Variant> Serialize for ItemTag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(T::ITEM_TYPE.as_str())
    }
}

impl<'de, T: Variant> Deserialize<'de> for ItemTag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        let expected = T::ITEM_TYPE.as_str();
        if tag == expected {
            Ok(Self::new())
        } else {
            Err(D::Error::invalid_value(Unexpected::Str(&tag), &expected))
        }
    }
}
