//! Weapon catalog for Geostrike.
//!
//! The wire protocol only ever sends a weapon's brand name (`"Amplifier"`,
//! `"ClusterBomb"`, ...). Price, speed, blast radius and the rest live in a
//! static catalog that both ends load independently. This crate is that
//! lookup: the [`Catalog`] trait, and [`StaticCatalog`], built from JSON
//! configuration.
//!
//! ```json
//! { "items": [ { "id": 1, "name": "Amplifier", "description": "...",
//!                "price": 100, "image": "amplifier.png", "speed": 80,
//!                "blastRadius": 20, "damage": 10, "falloutTime": 5 } ] }
//! ```

mod error;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use error::CatalogError;

/// One purchasable weapon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub id: i64,
    /// Brand name; this is what `Missile.type` / `Landmine.type` carry.
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub speed: f64,
    pub blast_radius: f64,
    pub damage: f64,
    pub fallout_time: f64,
}

/// Looks up item definitions by brand name.
pub trait Catalog: Send + Sync {
    /// The definition for `brand`, if the catalog has one.
    fn item(&self, brand: &str) -> Option<&ItemDefinition>;

    /// Every brand in the catalog, in load order.
    fn brands(&self) -> Vec<&str>;

    /// Returns `true` if `brand` is in the catalog.
    fn contains(&self, brand: &str) -> bool {
        self.item(brand).is_some()
    }
}

/// The on-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDefinition>,
}

/// An immutable in-memory [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<ItemDefinition>,
    by_name: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Builds a catalog from a list of items.
    ///
    /// # Errors
    /// [`CatalogError::DuplicateBrand`] if two items share a name.
    pub fn from_items(items: Vec<ItemDefinition>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if by_name.insert(item.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateBrand(item.name.clone()));
            }
        }
        tracing::debug!(items = items.len(), "catalog loaded");
        Ok(Self { items, by_name })
    }

    /// Parses a catalog from JSON text of the form `{ "items": [...] }`.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text).map_err(CatalogError::Parse)?;
        Self::from_items(file.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }
}

impl Catalog for StaticCatalog {
    fn item(&self, brand: &str) -> Option<&ItemDefinition> {
        self.by_name.get(brand).map(|&index| &self.items[index])
    }

    fn brands(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}
