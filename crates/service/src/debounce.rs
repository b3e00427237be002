//! Per-document debouncing of version increments
//!
//! Absorbs bursts of near-simultaneous saves so a document is not
//! incremented once per near-duplicate save. The timestamp lives in the
//! persisted document state, so the gate survives process restarts.

use docver_core::{Clock, DocumentId, HistoryStore, VersionError};
use std::sync::Arc;

/// Minimum elapsed time between two accepted increments on one document
pub const DEBOUNCE_WINDOW_MS: u64 = 30_000;

pub struct DebounceTracker {
    store: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    window_ms: u64,
}

impl DebounceTracker {
    pub fn new(store: Arc<dyn HistoryStore>, clock: Arc<dyn Clock>, window_ms: u64) -> Self {
        Self {
            store,
            clock,
            window_ms,
        }
    }

    /// True iff no prior increment is recorded, or strictly more than the
    /// window has elapsed since it. Exactly the window is still blocked.
    pub async fn should_increment(&self, document: &DocumentId) -> Result<bool, VersionError> {
        let last = self
            .store
            .get_document_state(document)
            .await?
            .and_then(|state| state.last_increment_ts_ms);

        Ok(match last {
            Some(last) => self.clock.now_ms().saturating_sub(last) > self.window_ms,
            None => true,
        })
    }

    /// Persist `now` as the last increment time
    ///
    /// Called only after a fully persisted increment, never speculatively.
    pub async fn record_increment(&self, document: &DocumentId) -> Result<(), VersionError> {
        let mut state = self
            .store
            .get_document_state(document)
            .await?
            .unwrap_or_default();
        state.last_increment_ts_ms = Some(self.clock.now_ms());
        self.store.update_document_state(document, state).await
    }

    /// Remove the timestamp; the next save is unconditionally eligible
    pub async fn clear(&self, document: &DocumentId) -> Result<(), VersionError> {
        let Some(mut state) = self.store.get_document_state(document).await? else {
            return Ok(());
        };
        state.last_increment_ts_ms = None;
        self.store.update_document_state(document, state).await
    }
}
