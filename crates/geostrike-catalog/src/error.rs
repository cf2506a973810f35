//! Error types for the catalog.

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog text isn't valid JSON or doesn't match the item shape.
    #[error("catalog parse failed: {0}")]
    Parse(#[source] serde_json::Error),

    /// Two items share a brand name, so lookups would be ambiguous.
    #[error("duplicate catalog brand {0:?}")]
    DuplicateBrand(String),
}
