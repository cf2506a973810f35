//! Envelope round trips through the public API.
//!
//! These go through the full wire path (typed values → JSON text →
//! postcard frame → JSON value → classification) the way a client and a
//! server would on either side of a socket.

use std::collections::HashMap;

use geostrike_protocol::{
    Echo, EnvelopeCodec, FetchMissiles, GeoLocation, ItemType, JsonCodec, Landmine,
    LocationUpdate, Loot, Missile, MissileGroup, MissileKey, Msg, Other, Player,
    PlayerLandmineMiss, PlayerMissileHit, ProtocolError, WeaponBrand, pack, pack_one, unpack,
};

fn alice() -> Player {
    Player::new("alice", GeoLocation::new(0.0, 0.0), "t0")
}

fn missile(id: i64, sender: &str) -> Missile {
    Missile::new(
        "TheNuke",
        "in-flight",
        GeoLocation::new(48.8566, 2.3522),
        GeoLocation::new(48.0, 2.0),
        id,
        100.0,
        500.0,
        sender,
        "2024-05-01T12:00:00Z",
        "2024-05-01T12:10:00Z",
    )
}

#[test]
fn test_single_geolocation_round_trip() {
    let bytes = pack(&[GeoLocation::new(40.0, -73.0).into()]).unwrap();
    let envelope = unpack(&bytes).unwrap();

    assert_eq!(envelope.len(), 1);
    let Msg::GeoLocation(location) = &envelope.messages[0] else {
        panic!("expected a GeoLocation, got {:?}", envelope.messages[0]);
    };
    assert_eq!(location.latitude, 40.0);
    assert_eq!(location.longitude, -73.0);
    assert_eq!(location.item_type(), ItemType::GeoLocation);
}

#[test]
fn test_missile_hit_nested_values_are_concrete() {
    let hit = PlayerMissileHit::new(alice(), missile(7, "alice"));
    let envelope = unpack(&pack_one(&hit.clone().into()).unwrap()).unwrap();

    let Msg::PlayerMissileHit(back) = &envelope.messages[0] else {
        panic!("expected a PlayerMissileHit");
    };
    assert_eq!(back.missile.missile_id, 7);
    assert_eq!(back.player.username, "alice");
    assert_eq!(back.player.location.item_type(), ItemType::GeoLocation);
    assert_eq!(back, &hit);
}

#[test]
fn test_empty_envelope_round_trip() {
    let envelope = unpack(&pack(&[]).unwrap()).unwrap();
    assert!(envelope.is_empty());
}

#[test]
fn test_mixed_envelope_round_trip_preserves_order() {
    let messages: Vec<Msg> = vec![
        LocationUpdate::new(alice(), GeoLocation::new(1.0, 1.0)).into(),
        PlayerMissileHit::new(alice(), missile(1, "bob")).into(),
        Echo::new("ping").into(),
        Loot::new(5, GeoLocation::new(2.0, 2.0), "common", "t7").into(),
        Other::new(6, "fallout", 30.0, GeoLocation::new(3.0, 3.0), "t8").into(),
        PlayerLandmineMiss::new(
            alice(),
            Landmine::new(9, "Landmine1", 20.0, GeoLocation::new(4.0, 4.0), "alice", "t1", "t2"),
        )
        .into(),
        MissileGroup::new(vec![missile(1, "alice"), missile(2, "alice")]).into(),
        WeaponBrand::Missile2.into(),
        WeaponBrand::Landmine1.into(),
        FetchMissiles::new().into(),
    ];

    let envelope = unpack(&pack(&messages).unwrap()).unwrap();
    assert_eq!(envelope.messages, messages);
}

#[test]
fn test_three_messages_keep_their_order() {
    let a: Msg = Echo::new("a").into();
    let b: Msg = Echo::new("b").into();
    let c: Msg = Echo::new("c").into();

    let envelope = unpack(&pack(&[a.clone(), b.clone(), c.clone()]).unwrap()).unwrap();
    assert_eq!(envelope.into_messages(), vec![a, b, c]);
}

#[test]
fn test_same_missile_id_from_two_players_stays_distinct() {
    let group = MissileGroup::new(vec![missile(1, "alice"), missile(1, "bob")]);
    let envelope = unpack(&pack_one(&group.into()).unwrap()).unwrap();

    let Msg::MissileGroup(back) = &envelope.messages[0] else {
        panic!("expected a MissileGroup");
    };
    let by_key: HashMap<MissileKey, &Missile> =
        back.missiles.iter().map(|m| (m.key(), m)).collect();

    assert_eq!(back.missiles.len(), 2);
    assert_eq!(by_key.len(), 2);
    assert_eq!(
        by_key[&MissileKey { sent_by_username: "bob".into(), missile_id: 1 }].sent_by_username,
        "bob"
    );
}

#[test]
fn test_f64_fields_are_not_truncated() {
    let precise = GeoLocation::new(0.1 + 0.2, 1.0 / 3.0);
    let envelope = unpack(&pack_one(&precise.into()).unwrap()).unwrap();
    assert_eq!(envelope.messages[0], Msg::GeoLocation(precise));
}

#[test]
fn test_unknown_variant_fails_the_whole_unpack() {
    let text = r#"{"messages":[{"itemType":"Echo","text":"ok"},{"itemType":"Bogus"}]}"#;
    let bytes = postcard::to_allocvec(&text).unwrap();

    let err = unpack(&bytes).unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownVariant(tag) if tag == "Bogus"));
}

#[test]
fn test_corrupt_bytes_are_decode_error() {
    // Length prefix claims 100 bytes; only 3 follow.
    let err = unpack(&[100, b'{', b'}', b' ']).unwrap_err();
    assert!(matches!(err, ProtocolError::Decode(_)));
}

#[test]
fn test_json_codec_interoperates_with_text_peers() {
    let codec = EnvelopeCodec::new(JsonCodec);
    let text = br#"{"messages":[{"itemType":"Landmine3","extra":1},{"itemType":"FetchMissiles"}]}"#;

    let envelope = codec.unpack(text).unwrap();
    assert_eq!(
        envelope.messages,
        vec![Msg::Brand(WeaponBrand::Landmine3), FetchMissiles::new().into()]
    );
}
