//! Adapters from persisted store rows to protocol variants.
//!
//! The datastore names its columns its own way (`destLat`, `sentBy`,
//! `Expires`, ...) and keeps coordinates as flat pairs. This is the only
//! place those names appear: each adapter renames the columns to protocol
//! fields and nests coordinate pairs into [`GeoLocation`]s.
//!
//! The mapping is one-way (store → protocol) and does no coercion: a
//! numeric column must hold a JSON number, an id an integer, a timestamp a
//! string.

use serde_json::{Map, Value};

use crate::{GeoLocation, Landmine, Loot, Missile, Other, ProtocolError};

/// An untyped row as handed over by the datastore client.
pub type Record = Map<String, Value>;

/// Typed access to one record's columns, with errors naming the record.
struct Columns<'a> {
    name: &'static str,
    record: &'a Record,
}

impl<'a> Columns<'a> {
    fn new(name: &'static str, record: &'a Record) -> Self {
        Self { name, record }
    }

    fn get(&self, field: &'static str) -> Result<&'a Value, ProtocolError> {
        self.record.get(field).ok_or(ProtocolError::MissingField {
            record: self.name,
            field,
        })
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> ProtocolError {
        ProtocolError::InvalidField {
            record: self.name,
            field,
            expected,
        }
    }

    fn float(&self, field: &'static str) -> Result<f64, ProtocolError> {
        self.get(field)?
            .as_f64()
            .ok_or_else(|| self.invalid(field, "a number"))
    }

    fn int(&self, field: &'static str) -> Result<i64, ProtocolError> {
        self.get(field)?
            .as_i64()
            .ok_or_else(|| self.invalid(field, "an integer"))
    }

    fn string(&self, field: &'static str) -> Result<String, ProtocolError> {
        self.get(field)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn location(
        &self,
        lat: &'static str,
        long: &'static str,
    ) -> Result<GeoLocation, ProtocolError> {
        Ok(GeoLocation::new(self.float(lat)?, self.float(long)?))
    }
}

impl Missile {
    /// Maps a stored missile row.
    ///
    /// | column                      | field              |
    /// |-----------------------------|--------------------|
    /// | `type`, `status`            | same               |
    /// | `destLat` / `destLong`      | `destination`      |
    /// | `currentLat`/`currentLong`  | `currentLocation`  |
    /// | `id`                        | `missileId`        |
    /// | `damage`, `radius`          | same               |
    /// | `sentBy`                    | `sentByUsername`   |
    /// | `sentAt`                    | `timeSent`         |
    /// | `timeToImpact`              | `etaTimeToImpact`  |
    pub fn from_record(record: &Record) -> Result<Self, ProtocolError> {
        let c = Columns::new("Missile", record);
        Ok(Missile::new(
            c.string("type")?,
            c.string("status")?,
            c.location("destLat", "destLong")?,
            c.location("currentLat", "currentLong")?,
            c.int("id")?,
            c.float("damage")?,
            c.float("radius")?,
            c.string("sentBy")?,
            c.string("sentAt")?,
            c.string("timeToImpact")?,
        ))
    }
}

impl Landmine {
    /// Maps a stored landmine row: `locLat`/`locLong` → `location`,
    /// `placedBy` and `placedTime` as-is, `Expires` → `etaExpireTime`.
    pub fn from_record(record: &Record) -> Result<Self, ProtocolError> {
        let c = Columns::new("Landmine", record);
        Ok(Landmine::new(
            c.int("id")?,
            c.string("type")?,
            c.float("damage")?,
            c.location("locLat", "locLong")?,
            c.string("placedBy")?,
            c.string("placedTime")?,
            c.string("Expires")?,
        ))
    }
}

impl Loot {
    /// Maps a stored loot row: `locLat`/`locLong` → `location`,
    /// `Expires` → `expireTime`.
    pub fn from_record(record: &Record) -> Result<Self, ProtocolError> {
        let c = Columns::new("Loot", record);
        Ok(Loot::new(
            c.int("id")?,
            c.location("locLat", "locLong")?,
            c.string("rarity")?,
            c.string("Expires")?,
        ))
    }
}

impl Other {
    /// Maps a stored row for any other timed entity.
    pub fn from_record(record: &Record) -> Result<Self, ProtocolError> {
        let c = Columns::new("Other", record);
        Ok(Other::new(
            c.int("id")?,
            c.string("type")?,
            c.float("radius")?,
            c.location("locLat", "locLong")?,
            c.string("Expires")?,
        ))
    }
}
