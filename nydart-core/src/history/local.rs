//! Bounded, newest-first history of analyses kept on this machine.

use tracing::{debug, warn};

use super::store::KeyValueStore;
use super::{LOCAL_HISTORY_LIMIT, RECENT_ANALYSES_KEY};
use crate::analysis::RecentAnalysisEntry;
use crate::error::{AdvisorError, Result};

/// Local history persisted under [`RECENT_ANALYSES_KEY`].
///
/// Read-modify-write is not atomic across processes; two concurrent writers
/// can lose an update.
#[derive(Debug)]
pub struct LocalHistory<S> {
    store: S,
    limit: usize,
}

impl<S: KeyValueStore> LocalHistory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limit: LOCAL_HISTORY_LIMIT,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored entries, newest first. A corrupt value reads as empty.
    pub fn load(&self) -> Vec<RecentAnalysisEntry> {
        let raw = match self.store.get(RECENT_ANALYSES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read local history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<RecentAnalysisEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.limit);
                entries
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable local history");
                Vec::new()
            }
        }
    }

    /// Prepend `entry`, keep the newest [`LOCAL_HISTORY_LIMIT`] and persist.
    ///
    /// The entry id is bumped past the newest stored id if needed so ids stay
    /// unique. Returns the updated list.
    pub fn record(&self, mut entry: RecentAnalysisEntry) -> Result<Vec<RecentAnalysisEntry>> {
        let mut entries = self.load();

        if let Some(max_id) = entries.iter().map(|e| e.id).max() {
            if entry.id <= max_id {
                entry.id = max_id + 1;
            }
        }

        entries.insert(0, entry);
        entries.truncate(self.limit);

        let serialized = serde_json::to_string(&entries)
            .map_err(|e| AdvisorError::Storage(format!("Failed to serialize history: {e}")))?;
        self.store.set(RECENT_ANALYSES_KEY, &serialized)?;

        debug!(entries = entries.len(), "Recorded local analysis");
        Ok(entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear(RECENT_ANALYSES_KEY)
    }
}
