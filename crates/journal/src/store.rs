//! Sled-backed history store

use async_trait::async_trait;
use docver_core::{
    DocumentId, DocumentState, HistoryStore, VersionError, VersionHistoryEntry, HISTORY_CAP,
};
use sled::Db;
use std::path::Path;

/// Per-document state records in a single sled tree
///
/// Keys are document ids, values are bincode-encoded [`DocumentState`].
/// Every write is flushed before returning.
pub struct SledHistoryStore {
    db: Db,
    history_cap: usize,
}

impl SledHistoryStore {
    /// Open or create the store under the given directory
    pub fn open(dir: &Path) -> Result<Self, VersionError> {
        let db = sled::open(dir.join("history.db"))
            .map_err(|e| VersionError::persistence("store open", e))?;
        Ok(Self {
            db,
            history_cap: HISTORY_CAP,
        })
    }

    /// Override the history FIFO cap (default [`HISTORY_CAP`])
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    fn load(&self, document: &DocumentId) -> Result<Option<DocumentState>, VersionError> {
        let value = self
            .db
            .get(document.as_str().as_bytes())
            .map_err(|e| VersionError::persistence("state read", e))?;
        match value {
            Some(bytes) => {
                let state = bincode::deserialize(&bytes)
                    .map_err(|e| VersionError::persistence("state decode", e))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn save(&self, document: &DocumentId, state: &DocumentState) -> Result<(), VersionError> {
        let bytes = bincode::serialize(state)
            .map_err(|e| VersionError::persistence("state encode", e))?;
        self.db
            .insert(document.as_str().as_bytes(), bytes)
            .map_err(|e| VersionError::persistence("state write", e))?;
        // Flush to ensure durability
        self.db
            .flush()
            .map_err(|e| VersionError::persistence("state flush", e))?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SledHistoryStore {
    async fn get_document_state(
        &self,
        document: &DocumentId,
    ) -> Result<Option<DocumentState>, VersionError> {
        self.load(document)
    }

    async fn update_document_state(
        &self,
        document: &DocumentId,
        state: DocumentState,
    ) -> Result<(), VersionError> {
        self.save(document, &state)
    }

    async fn add_entry(&self, entry: VersionHistoryEntry) -> Result<(), VersionError> {
        let document = entry.document_id.clone();
        let mut state = self.load(&document)?.unwrap_or_default();

        state.history.push(entry);

        // Oldest-first eviction once the cap is reached
        let overflow = state.history.len().saturating_sub(self.history_cap);
        if overflow > 0 {
            tracing::debug!(%document, evicted = overflow, "history cap reached");
            state.history.drain(..overflow);
        }

        self.save(&document, &state)
    }

    async fn get_history(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<VersionHistoryEntry>, VersionError> {
        Ok(self
            .load(document)?
            .map(|state| state.history)
            .unwrap_or_default())
    }

    async fn clear_history(&self, document: &DocumentId) -> Result<(), VersionError> {
        let Some(mut state) = self.load(document)? else {
            return Ok(());
        };
        state.history.clear();
        self.save(document, &state)
    }
}
