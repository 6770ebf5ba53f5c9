//! Static JSON schema loading
//!
//! Schemas ship with the binary; they are embedded at compile time and
//! parsed once on first access.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

macro_rules! embed_schema {
    ($map:ident, $id:literal) => {
        $map.insert(
            $id,
            serde_json::from_str(include_str!(concat!("../../schemas/", $id, ".json")))
                .expect(concat!("invalid embedded schema: ", $id)),
        );
    };
}

static SCHEMAS: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    let mut map = HashMap::new();
    embed_schema!(map, "account");
    embed_schema!(map, "agents");
    embed_schema!(map, "bans");
    embed_schema!(map, "chats");
    embed_schema!(map, "departments");
    embed_schema!(map, "goals");
    embed_schema!(map, "shortcuts");
    embed_schema!(map, "triggers");
    map
});

/// Load the JSON schema for a collection
pub fn load_schema(collection_id: &str) -> Result<&'static Value> {
    SCHEMAS
        .get(collection_id)
        .ok_or_else(|| Error::SchemaNotFound {
            collection: collection_id.to_string(),
        })
}

/// Top-level property names of a collection's schema
pub fn schema_properties(collection_id: &str) -> Result<Vec<String>> {
    let schema = load_schema(collection_id)?;
    let props = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::response_shape(collection_id, "schema missing properties"))?;
    Ok(props.keys().cloned().collect())
}
