//! Classification: turning an untyped record back into a typed [`Msg`].
//!
//! Decoding happens in two steps. The envelope text is parsed into a
//! generic [`serde_json::Value`], then every element of `messages` goes
//! through [`classify`], which reads `itemType` and rebuilds the matching
//! variant. Nested protocol values are rebuilt as their concrete types too:
//! a `Missile`'s `destination` comes back as a [`GeoLocation`], not as a
//! map.
//!
//! [`GeoLocation`]: crate::GeoLocation

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::tag::Variant;
use crate::{FetchMissiles, ItemType, Msg, ProtocolError, WeaponBrand, WebSocketMessage};

/// Rebuilds the concrete variant named by `record["itemType"]`.
///
/// Brand markers and `FetchMissiles` carry no payload; any extra fields on
/// them are ignored and a canonical instance is returned.
///
/// # Errors
///
/// - [`ProtocolError::MissingItemType`] if there is no string `itemType`.
/// - [`ProtocolError::UnknownVariant`] if the tag is not in the closed set.
/// - [`ProtocolError::InvalidPayload`] if the fields don't fit the variant.
pub fn classify(record: Value) -> Result<Msg, ProtocolError> {
    let item_type: ItemType = record
        .get("itemType")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingItemType)?
        .parse()?;

    let msg = match item_type {
        ItemType::Echo => Msg::Echo(payload(record)?),
        ItemType::GeoLocation => Msg::GeoLocation(payload(record)?),
        ItemType::Player => Msg::Player(payload(record)?),
        ItemType::LocationUpdate => Msg::LocationUpdate(payload(record)?),
        ItemType::Missile => Msg::Missile(payload(record)?),
        ItemType::Landmine => Msg::Landmine(payload(record)?),
        ItemType::Loot => Msg::Loot(payload(record)?),
        ItemType::Other => Msg::Other(payload(record)?),
        ItemType::PlayerMissileHit => Msg::PlayerMissileHit(payload(record)?),
        ItemType::PlayerLandmineHit => Msg::PlayerLandmineHit(payload(record)?),
        ItemType::PlayerLootHit => Msg::PlayerLootHit(payload(record)?),
        ItemType::PlayerMissileMiss => Msg::PlayerMissileMiss(payload(record)?),
        ItemType::PlayerLandmineMiss => Msg::PlayerLandmineMiss(payload(record)?),
        ItemType::MissileGroup => Msg::MissileGroup(payload(record)?),
        ItemType::Missile1
        | ItemType::Missile2
        | ItemType::Missile3
        | ItemType::Landmine1
        | ItemType::Landmine2
        | ItemType::Landmine3 => WeaponBrand::from_item_type(item_type)
            .map(Msg::Brand)
            .ok_or_else(|| ProtocolError::UnknownVariant(item_type.to_string()))?,
        ItemType::FetchMissiles => Msg::FetchMissiles(FetchMissiles::new()),
    };
    Ok(msg)
}

fn payload<T: Variant + DeserializeOwned>(record: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(record).map_err(|source| ProtocolError::InvalidPayload {
        item_type: T::ITEM_TYPE.as_str(),
        source,
    })
}

impl WebSocketMessage {
    /// Builds a typed envelope from its generic JSON shape.
    ///
    /// All-or-nothing: the first element that fails classification fails
    /// the whole envelope.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::MalformedEnvelope`] if `value` is not an object
    /// with a `messages` array, otherwise whatever [`classify`] returns for
    /// the first bad element.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let Value::Object(mut envelope) = value else {
            return Err(ProtocolError::MalformedEnvelope(format!(
                "expected an object, found {}",
                json_kind(&value)
            )));
        };

        let items = match envelope.remove("messages") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ProtocolError::MalformedEnvelope(format!(
                    "`messages` is {}, expected an array",
                    json_kind(&other)
                )));
            }
            None => {
                return Err(ProtocolError::MalformedEnvelope(
                    "missing `messages` array".into(),
                ));
            }
        };

        let mut messages = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match classify(item) {
                Ok(msg) => messages.push(msg),
                Err(e) => {
                    tracing::debug!(index, error = %e, "envelope element rejected");
                    return Err(e);
                }
            }
        }
        Ok(Self::new(messages))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoLocation, Landmine, Loot, Missile, MissileGroup, Other, Player, PlayerLootHit};
    use serde_json::json;

    fn origin() -> GeoLocation {
        GeoLocation::new(0.0, 0.0)
    }

    fn missile(id: i64, sender: &str) -> Missile {
        Missile::new(
            "Zippy", "in-flight", GeoLocation::new(1.0, 2.0), origin(), id, 10.0, 50.0, sender, "t0",
            "t1",
        )
    }

    /// Serializes a message and classifies it back.
    fn reclassify(msg: Msg) -> Msg {
        classify(serde_json::to_value(&msg).unwrap()).unwrap()
    }

    #[test]
    fn test_every_payload_variant_reclassifies_to_itself() {
        let player = Player::new("alice", origin(), "t0");
        let landmine = Landmine::new(2, "Landmine1", 30.0, origin(), "bob", "t0", "t5");
        let loot = Loot::new(3, origin(), "epic", "t9");
        let samples: Vec<Msg> = vec![
            crate::Echo::new("hello").into(),
            origin().into(),
            player.clone().into(),
            crate::LocationUpdate::new(player.clone(), GeoLocation::new(3.0, 4.0)).into(),
            missile(1, "alice").into(),
            landmine.clone().into(),
            loot.clone().into(),
            Other::new(4, "storm", 75.0, origin(), "t8").into(),
            crate::PlayerMissileHit::new(player.clone(), missile(1, "bob")).into(),
            crate::PlayerLandmineHit::new(player.clone(), landmine.clone()).into(),
            PlayerLootHit::new(player.clone(), loot).into(),
            crate::PlayerMissileMiss::new(player.clone(), missile(2, "alice")).into(),
            crate::PlayerLandmineMiss::new(player, landmine).into(),
            MissileGroup::new(vec![missile(1, "alice"), missile(2, "alice")]).into(),
            WeaponBrand::Missile1.into(),
            WeaponBrand::Landmine3.into(),
            FetchMissiles::new().into(),
        ];

        for msg in samples {
            let expected = msg.item_type();
            let back = reclassify(msg.clone());
            assert_eq!(back.item_type(), expected);
            assert_eq!(back, msg, "{expected} did not survive classification");
        }
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = classify(json!({ "itemType": "Bogus", "x": 1 })).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownVariant(tag) if tag == "Bogus"));
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let err = classify(json!({ "latitude": 1.0, "longitude": 2.0 })).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingItemType));

        let err = classify(json!({ "itemType": 5 })).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingItemType));
    }

    #[test]
    fn test_marker_variant_ignores_payload() {
        let msg = classify(json!({ "itemType": "Missile2", "damage": 999, "junk": [1, 2] })).unwrap();
        assert_eq!(msg, Msg::Brand(WeaponBrand::Missile2));

        let msg = classify(json!({ "itemType": "FetchMissiles", "please": true })).unwrap();
        assert_eq!(msg, Msg::FetchMissiles(FetchMissiles::new()));
    }

    #[test]
    fn test_every_brand_tag_classifies_to_its_brand() {
        let mut brands = 0;
        for &item_type in ItemType::ALL {
            let Some(brand) = WeaponBrand::from_item_type(item_type) else {
                continue;
            };
            let msg = classify(json!({ "itemType": item_type.as_str() })).unwrap();
            assert_eq!(msg, Msg::Brand(brand));
            assert_eq!(msg.item_type(), item_type);
            brands += 1;
        }
        assert_eq!(brands, 6);
    }

    #[test]
    fn test_nested_values_come_back_concrete() {
        let group = MissileGroup::new(vec![missile(7, "alice")]);
        let Msg::MissileGroup(back) = reclassify(group.into()) else {
            panic!("expected a MissileGroup");
        };
        let first = &back.missiles[0];
        assert_eq!(first.item_type(), ItemType::Missile);
        assert_eq!(first.destination.item_type(), ItemType::GeoLocation);
        assert_eq!(first.destination, GeoLocation::new(1.0, 2.0));
    }

    #[test]
    fn test_payload_missing_field_is_invalid_payload() {
        let err = classify(json!({ "itemType": "GeoLocation", "latitude": 1.0 })).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidPayload { item_type: "GeoLocation", .. }
        ));
    }

    #[test]
    fn test_f64_precision_survives() {
        let precise = GeoLocation::new(40.712_775_123_456_78, -74.005_973_987_654_32);
        assert_eq!(reclassify(precise.into()), Msg::GeoLocation(precise));
    }

    #[test]
    fn test_envelope_from_value_preserves_order() {
        let value = json!({
            "messages": [
                { "itemType": "Echo", "text": "a" },
                { "itemType": "Landmine1" },
                { "itemType": "Echo", "text": "b" }
            ]
        });
        let envelope = WebSocketMessage::from_value(value).unwrap();
        assert_eq!(
            envelope.messages,
            vec![
                crate::Echo::new("a").into(),
                WeaponBrand::Landmine1.into(),
                crate::Echo::new("b").into(),
            ]
        );
    }

    #[test]
    fn test_envelope_without_messages_is_malformed() {
        let err = WebSocketMessage::from_value(json!({ "msgs": [] })).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedEnvelope(_)));

        let err = WebSocketMessage::from_value(json!({ "messages": {} })).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedEnvelope(_)));

        let err = WebSocketMessage::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_one_bad_element_fails_the_whole_envelope() {
        let value = json!({
            "messages": [
                { "itemType": "Echo", "text": "ok" },
                { "itemType": "Bogus" }
            ]
        });
        let err = WebSocketMessage::from_value(value).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownVariant(_)));
    }
}
