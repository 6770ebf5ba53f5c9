//! Multi-strategy replication engine
//!
//! Walks the collection table in declaration order and replicates each
//! selected collection with the pagination strategy its descriptor
//! names. The persisted `currently_syncing` marker plus the fixed walk
//! order make interrupted runs resumable: a restart skips every
//! collection before the marker and re-enters the marked one using its
//! own bookmarks.

mod resync;
mod types;

pub use resync::should_force_full_resync;
pub use types::SyncStats;

use crate::catalog::{Catalog, CatalogEntry};
use crate::collections::{self, CollectionDescriptor, COLLECTIONS};
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::http::{ApiClient, ApiRequest};
use crate::output::{project_record, Message, MessageSink};
use crate::pagination::break_into_intervals;
use crate::state::{ChatSubtype, StateManager};
use crate::types::PaginationKind;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Replication engine for one sync run
pub struct SyncEngine<'a> {
    client: &'a ApiClient,
    config: &'a ConnectorConfig,
    catalog: &'a Catalog,
    state: &'a mut StateManager,
    sink: &'a mut dyn MessageSink,
    now: DateTime<Utc>,
    stats: SyncStats,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine over borrowed components
    pub fn new(
        client: &'a ApiClient,
        config: &'a ConnectorConfig,
        catalog: &'a Catalog,
        state: &'a mut StateManager,
        sink: &'a mut dyn MessageSink,
    ) -> Self {
        Self {
            client,
            config,
            catalog,
            state,
            sink,
            now: Utc::now(),
            stats: SyncStats::new(),
        }
    }

    /// Pin the wall clock, so search windows and resync decisions are
    /// reproducible
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Run a full sync pass over every selected collection
    pub async fn run(&mut self) -> Result<SyncStats> {
        let selected = self.catalog.selected_ids();
        let resume_from = self
            .state
            .state()
            .currently_syncing
            .as_deref()
            .and_then(collections::position);
        if let Some(idx) = resume_from {
            info!("resuming interrupted run at '{}'", COLLECTIONS[idx].id);
        }

        for descriptor in &COLLECTIONS[resume_from.unwrap_or(0)..] {
            if !selected.contains(descriptor.id) {
                debug!("'{}' not selected, skipping", descriptor.id);
                continue;
            }
            let Some(entry) = self.catalog.entry(descriptor.id) else {
                debug!("'{}' absent from the catalog, skipping", descriptor.id);
                continue;
            };
            let entry = entry.clone();
            let allowed = entry.emitted_fields();

            self.state.state_mut().currently_syncing = Some(descriptor.id.to_string());
            self.checkpoint()?;
            self.emit_schema(&entry)?;

            info!("syncing '{}'", descriptor.id);
            let outcome = match descriptor.pagination_kind {
                PaginationKind::None => self.sync_fetch_all(descriptor, &allowed).await,
                PaginationKind::IdOffset => self.sync_id_offset(descriptor, &allowed).await,
                PaginationKind::WindowedSearch => self.sync_chats(&allowed).await,
            };
            match outcome {
                Ok(()) => self.stats.add_collection(),
                Err(err) if descriptor.skip_on_forbidden && err.is_forbidden() => {
                    warn!(
                        "'{}' returned 403, not available on this account plan; skipping",
                        descriptor.id
                    );
                    self.stats.add_skipped();
                }
                Err(err) => return Err(err),
            }
            self.checkpoint()?;
        }

        self.state.state_mut().currently_syncing = None;
        self.checkpoint()?;
        info!(
            "sync complete: {} records across {} collections",
            self.stats.records_synced, self.stats.collections_synced
        );
        Ok(self.stats.clone())
    }

    /// Single-request replication for collections without pagination
    async fn sync_fetch_all(
        &mut self,
        descriptor: &CollectionDescriptor,
        allowed: &HashSet<String>,
    ) -> Result<()> {
        let body = self.client.request(descriptor.id, ApiRequest::new()).await?;
        let records = match body {
            Value::Array(items) => items,
            // The account endpoint returns a single object.
            other => vec![other],
        };
        self.emit_page(descriptor.id, records, allowed)
    }

    /// Id-offset replication: request pages with ascending `since_id`
    /// until the upstream returns an empty page
    ///
    /// The in-flight offset is checkpointed after every page and nulled
    /// on completion. These collections have no cross-run ordering
    /// guarantee, so a finished pass must not leave a stale offset that
    /// would make the next run start mid-way.
    async fn sync_id_offset(
        &mut self,
        descriptor: &CollectionDescriptor,
        allowed: &HashSet<String>,
    ) -> Result<()> {
        let limit = self.config.page_limit(descriptor.id).to_string();
        loop {
            let since_id = self
                .state
                .state()
                .bookmarks
                .offset(descriptor.id)
                .and_then(|b| b.since_id)
                .unwrap_or(0);
            let body = self
                .client
                .request(
                    descriptor.id,
                    ApiRequest::new()
                        .query("since_id", since_id.to_string())
                        .query("limit", limit.clone()),
                )
                .await?;
            let records = id_offset_page(descriptor.id, body)?;
            if records.is_empty() {
                break;
            }
            let last_id = records
                .last()
                .and_then(|r| r.get("id"))
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    Error::response_shape(descriptor.id, "record missing numeric 'id'")
                })?;
            self.emit_page(descriptor.id, records, allowed)?;
            if let Some(bookmark) = self.state.state_mut().bookmarks.offset_mut(descriptor.id) {
                bookmark.since_id = Some(last_id + 1);
            }
            self.checkpoint()?;
        }
        if let Some(bookmark) = self.state.state_mut().bookmarks.offset_mut(descriptor.id) {
            bookmark.since_id = None;
        }
        self.checkpoint()
    }

    /// Windowed-search replication for chats, one pass per subtype
    async fn sync_chats(&mut self, allowed: &HashSet<String>) -> Result<()> {
        let full_sync = should_force_full_resync(
            self.config.chats_full_sync_days,
            self.state.state().chats_last_full_sync.as_deref(),
            self.now,
        )?;
        for subtype in ChatSubtype::ALL {
            self.pull_chat_window(subtype, full_sync, allowed).await?;
        }
        if full_sync {
            self.state.state_mut().chats_last_full_sync = Some(self.now.to_rfc3339());
            self.checkpoint()?;
        }
        Ok(())
    }

    /// Pull one chat subtype through day-sized search windows
    ///
    /// Each window is searched and each result page's ids are fetched
    /// in bulk. The opaque next-page link is checkpointed only after
    /// the page's records are emitted, so a crash mid-page re-fetches
    /// that page as an at-least-once duplicate instead of skipping it.
    /// The cursor only advances when a window is fully drained; it
    /// records the maximum cursor-field value observed so far, not the
    /// window edge, because search results carry no ordering guarantee.
    async fn pull_chat_window(
        &mut self,
        subtype: ChatSubtype,
        full_sync: bool,
        allowed: &HashSet<String>,
    ) -> Result<()> {
        if full_sync {
            self.state
                .state_mut()
                .bookmarks
                .chats
                .window_mut(subtype)
                .clear();
            self.checkpoint()?;
        }
        let start_raw = self
            .state
            .chat_start_bound(subtype, &self.config.start_date)?;
        let start = parse_timestamp(&start_raw)?;
        let mut next_url = self
            .state
            .state()
            .bookmarks
            .chats
            .window(subtype)
            .next_url
            .clone();
        let mut max_seen = start;
        let mut max_seen_raw = start_raw;

        let interval_days = self.config.chat_search_interval_days;
        info!("pulling '{subtype}' chats in windows of {interval_days} days");

        for (begin, end) in break_into_intervals(interval_days, start, self.now) {
            loop {
                let request = match &next_url {
                    Some(url) => ApiRequest::new().url(url.clone()),
                    None => ApiRequest::new().suffix("/search").query(
                        "q",
                        format!(
                            "type:{} AND {}:[{} TO {}]",
                            subtype.search_type(),
                            subtype.cursor_field(),
                            begin.to_rfc3339(),
                            end.to_rfc3339()
                        ),
                    ),
                };
                let body = self.client.request("chats", request).await?;
                let page_next_url = body
                    .get("next_url")
                    .and_then(Value::as_str)
                    .map(str::to_string);

                let ids = search_result_ids(&body)?;
                let chats = self.bulk_chats(&ids).await?;
                if !chats.is_empty() {
                    for chat in &chats {
                        let Some(ts) = chat.get(subtype.cursor_field()).and_then(Value::as_str)
                        else {
                            continue;
                        };
                        match parse_timestamp(ts) {
                            Ok(parsed) if parsed > max_seen => {
                                max_seen = parsed;
                                max_seen_raw = ts.to_string();
                            }
                            Ok(_) => {}
                            Err(err) => warn!(
                                "unparseable {} '{ts}' on a '{subtype}' record: {err}",
                                subtype.cursor_field()
                            ),
                        }
                    }
                    self.emit_page("chats", chats, allowed)?;
                }

                // Advance the page link only once the page is emitted.
                next_url = page_next_url;
                self.state
                    .state_mut()
                    .bookmarks
                    .chats
                    .window_mut(subtype)
                    .next_url = next_url.clone();
                self.checkpoint()?;
                if next_url.is_none() {
                    break;
                }
            }
            self.state
                .state_mut()
                .bookmarks
                .chats
                .window_mut(subtype)
                .cursor = Some(max_seen_raw.clone());
            self.checkpoint()?;
        }
        Ok(())
    }

    /// Fetch full chat bodies for a page of search result ids
    async fn bulk_chats(&self, ids: &[String]) -> Result<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = self
            .client
            .request("chats", ApiRequest::new().query("ids", ids.join(",")))
            .await?;
        let docs = body
            .get("docs")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::response_shape("chats", "bulk response missing 'docs' map"))?;
        // Ids deleted between search and fetch come back as null docs.
        Ok(docs.values().filter(|v| !v.is_null()).cloned().collect())
    }

    fn emit_schema(&mut self, entry: &CatalogEntry) -> Result<()> {
        self.sink.emit(&Message::schema(
            entry.stream.clone(),
            entry.schema.clone(),
            entry.key_properties.clone(),
            entry.valid_replication_keys.clone(),
        ))
    }

    fn emit_page(
        &mut self,
        stream: &str,
        records: Vec<Value>,
        allowed: &HashSet<String>,
    ) -> Result<()> {
        let count = records.len();
        for record in records {
            self.sink
                .emit(&Message::record(stream, project_record(record, allowed)))?;
        }
        debug!("wrote a page of {count} '{stream}' records");
        self.stats.add_records(count);
        self.stats.add_page();
        Ok(())
    }

    /// Persist the state and mirror it to the output stream
    fn checkpoint(&mut self) -> Result<()> {
        self.state.flush()?;
        self.sink.emit(&Message::state(self.state.to_json()?))
    }
}

/// Extract the record page from an id-offset response body
///
/// Bans arrive as two parallel arrays (visitor bans and IP bans) that
/// form a single logical page; every other id-offset collection returns
/// a plain array.
fn id_offset_page(collection_id: &str, body: Value) -> Result<Vec<Value>> {
    if collection_id == "bans" {
        let Value::Object(mut map) = body else {
            return Err(Error::response_shape(collection_id, "expected an object"));
        };
        let mut records = Vec::new();
        for key in ["visitor", "ip_address"] {
            if let Some(Value::Array(items)) = map.remove(key) {
                records.extend(items);
            }
        }
        Ok(records)
    } else {
        match body {
            Value::Array(items) => Ok(items),
            _ => Err(Error::response_shape(collection_id, "expected an array")),
        }
    }
}

/// Ids from one page of search results
fn search_result_ids(body: &Value) -> Result<Vec<String>> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::response_shape("chats", "search response missing 'results'"))?;
    Ok(results
        .iter()
        .filter_map(|r| match r.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Parse an upstream timestamp
///
/// The API mostly emits RFC 3339, but some chat exports carry bare
/// `YYYY-MM-DDTHH:MM:SS` timestamps without an offset; those are UTC.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    // Re-run the strict parse for its error.
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
