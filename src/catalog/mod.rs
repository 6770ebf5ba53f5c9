//! Catalog and discovery
//!
//! Discovery probes the API, then lists every available collection with
//! its schema and replication metadata. Which collections and fields
//! actually get replicated is decided outside the connector by editing
//! the catalog; the engine only reads the selection.

mod discover;
mod types;

pub use discover::discover;
pub use types::{Catalog, CatalogEntry, FieldMetadata};
