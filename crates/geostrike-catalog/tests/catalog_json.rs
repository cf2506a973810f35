//! Loading catalogs from JSON configuration text.

use geostrike_catalog::{Catalog, CatalogError, StaticCatalog};

const STORE: &str = r#"{
    "items": [
        { "id": 1, "name": "Amplifier", "description": "Fast and cheap.",
          "price": 100, "image": "amplifier.png", "speed": 90,
          "blastRadius": 15, "damage": 10, "falloutTime": 2 },
        { "id": 2, "name": "Ballista", "description": "Long range.",
          "price": 250, "image": "ballista.png", "speed": 60,
          "blastRadius": 30, "damage": 25, "falloutTime": 5 },
        { "id": 3, "name": "ClusterBomb", "description": "Wide area.",
          "price": 400, "image": "cluster.png", "speed": 40,
          "blastRadius": 80, "damage": 15, "falloutTime": 10 },
        { "id": 4, "name": "TheNuke", "description": "Everything, gone.",
          "price": 5000, "image": "nuke.png", "speed": 20,
          "blastRadius": 500, "damage": 100, "falloutTime": 120 },
        { "id": 5, "name": "Zippy", "description": "Blink and you miss it.",
          "price": 150, "image": "zippy.png", "speed": 150,
          "blastRadius": 10, "damage": 5, "falloutTime": 1 }
    ]
}"#;

#[test]
fn test_store_catalog_loads_every_brand() {
    let catalog = StaticCatalog::from_json(STORE).unwrap();

    assert_eq!(catalog.len(), 5);
    assert_eq!(
        catalog.brands(),
        vec!["Amplifier", "Ballista", "ClusterBomb", "TheNuke", "Zippy"]
    );

    let nuke = catalog.item("TheNuke").unwrap();
    assert_eq!(nuke.price, 5000.0);
    assert_eq!(nuke.blast_radius, 500.0);
    assert_eq!(nuke.fallout_time, 120.0);
}

#[test]
fn test_missing_field_fails_to_parse() {
    let text = r#"{ "items": [ { "id": 1, "name": "Amplifier" } ] }"#;
    let err = StaticCatalog::from_json(text).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_not_json_fails_to_parse() {
    assert!(matches!(
        StaticCatalog::from_json("items = []").unwrap_err(),
        CatalogError::Parse(_)
    ));
}

#[test]
fn test_empty_item_list_is_valid() {
    let catalog = StaticCatalog::from_json(r#"{ "items": [] }"#).unwrap();
    assert!(catalog.is_empty());
}
