//! Engine types

/// Statistics from a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records emitted
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Collections fully replicated
    pub collections_synced: usize,
    /// Collections skipped because the endpoint was forbidden
    pub collections_skipped: usize,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a completed collection
    pub fn add_collection(&mut self) {
        self.collections_synced += 1;
    }

    /// Add a skipped collection
    pub fn add_skipped(&mut self) {
        self.collections_skipped += 1;
    }
}
