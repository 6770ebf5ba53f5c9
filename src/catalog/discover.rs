//! Discovery: probe the API and build the catalog

use super::types::{Catalog, CatalogEntry};
use crate::collections::COLLECTIONS;
use crate::error::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::schema;
use tracing::info;

/// Probe the API and list every collection available to this account
///
/// A fatal error here (bad token, upstream outage) prevents any schema
/// output. A 403 from the account endpoint is expected for integrated
/// Zendesk accounts and just excludes that collection.
pub async fn discover(client: &ApiClient) -> Result<Catalog> {
    // Connectivity check: surfaces bad credentials before any output.
    client.request("chats", ApiRequest::new()).await?;

    let account_available = match client.request("account", ApiRequest::new()).await {
        Ok(_) => true,
        Err(err) if err.is_forbidden() => {
            info!(
                "ignoring 403 from the account endpoint - this must be an integrated \
                 Zendesk account; excluding it from discovery"
            );
            false
        }
        Err(err) => return Err(err),
    };

    let mut streams = Vec::new();
    for descriptor in COLLECTIONS {
        if descriptor.id == "account" && !account_available {
            continue;
        }
        let schema = schema::load_schema(descriptor.id)?.clone();
        let properties = schema::schema_properties(descriptor.id)?;
        streams.push(CatalogEntry::from_descriptor(descriptor, schema, &properties));
    }

    Ok(Catalog { streams })
}
