//! Weapon brand markers.
//!
//! A brand names *which kind* of missile or landmine is meant without
//! re-sending the catalog entry (price, damage, speed, ...). Brands carry
//! no payload: on the wire a brand is just `{"itemType": "Missile2"}`.
//!
//! Brands come in two categories. [`MissileType`] and [`LandmineType`]
//! can only hold a brand of their own category, so a landmine brand can't
//! end up where a missile brand is expected.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{ItemType, Msg, ProtocolError};

/// The two brand families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrandCategory {
    Missile,
    Landmine,
}

impl fmt::Display for BrandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missile => f.write_str("missile"),
            Self::Landmine => f.write_str("landmine"),
        }
    }
}

/// A zero-payload weapon brand marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponBrand {
    Missile1,
    Missile2,
    Missile3,
    Landmine1,
    Landmine2,
    Landmine3,
}

impl WeaponBrand {
    /// Which family this brand belongs to.
    pub const fn category(self) -> BrandCategory {
        match self {
            Self::Missile1 | Self::Missile2 | Self::Missile3 => BrandCategory::Missile,
            Self::Landmine1 | Self::Landmine2 | Self::Landmine3 => BrandCategory::Landmine,
        }
    }

    /// The brand's discriminant.
    pub const fn item_type(self) -> ItemType {
        match self {
            Self::Missile1 => ItemType::Missile1,
            Self::Missile2 => ItemType::Missile2,
            Self::Missile3 => ItemType::Missile3,
            Self::Landmine1 => ItemType::Landmine1,
            Self::Landmine2 => ItemType::Landmine2,
            Self::Landmine3 => ItemType::Landmine3,
        }
    }

    /// The brand's tag name, identical to its `itemType`.
    pub const fn as_str(self) -> &'static str {
        self.item_type().as_str()
    }

    /// Looks up the brand for a tag. Returns `None` for tags that are not
    /// brands (including every non-brand variant tag).
    pub fn from_item_type(item_type: ItemType) -> Option<Self> {
        match item_type {
            ItemType::Missile1 => Some(Self::Missile1),
            ItemType::Missile2 => Some(Self::Missile2),
            ItemType::Missile3 => Some(Self::Missile3),
            ItemType::Landmine1 => Some(Self::Landmine1),
            ItemType::Landmine2 => Some(Self::Landmine2),
            ItemType::Landmine3 => Some(Self::Landmine3),
            _ => None,
        }
    }

    fn require(self, expected: BrandCategory) -> Result<Self, ProtocolError> {
        let actual = self.category();
        if actual == expected {
            Ok(self)
        } else {
            Err(ProtocolError::BrandMismatch {
                brand: self.as_str(),
                expected,
                actual,
            })
        }
    }
}

impl fmt::Display for WeaponBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WeaponBrand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("itemType", self.as_str())?;
        map.end()
    }
}

/// A brand known to be a missile brand.
///
/// Nothing in the wire format needs it; it is for consumers that keep a
/// "selected missile" slot and want the type system to keep landmine
/// brands out of it. Sends as its plain brand marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissileType(WeaponBrand);

impl MissileType {
    pub fn new(brand: WeaponBrand) -> Result<Self, ProtocolError> {
        brand.require(BrandCategory::Missile).map(Self)
    }

    pub fn brand(self) -> WeaponBrand {
        self.0
    }
}

impl TryFrom<WeaponBrand> for MissileType {
    type Error = ProtocolError;

    fn try_from(brand: WeaponBrand) -> Result<Self, Self::Error> {
        Self::new(brand)
    }
}

/// A brand known to be a landmine brand. The landmine counterpart of
/// [`MissileType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandmineType(WeaponBrand);

impl LandmineType {
    pub fn new(brand: WeaponBrand) -> Result<Self, ProtocolError> {
        brand.require(BrandCategory::Landmine).map(Self)
    }

    pub fn brand(self) -> WeaponBrand {
        self.0
    }
}

impl TryFrom<WeaponBrand> for LandmineType {
    type Error = ProtocolError;

    fn try_from(brand: WeaponBrand) -> Result<Self, Self::Error> {
        Self::new(brand)
    }
}

impl From<MissileType> for Msg {
    fn from(missile: MissileType) -> Self {
        Msg::Brand(missile.brand())
    }
}

impl From<LandmineType> for Msg {
    fn from(landmine: LandmineType) -> Self {
        Msg::Brand(landmine.brand())
    }
}
