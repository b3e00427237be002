//! Workflow orchestration: initialize, process-save, reset
//!
//! Each public operation is an async sequence of I/O-bound steps. At most
//! one operation runs at a time per document, enforced by an in-memory
//! marker set at entry and released on every exit path through a scoped
//! guard. Operations on different documents are fully concurrent.

use crate::config::ServiceConfig;
use crate::debounce::DebounceTracker;
use crate::detect::FileChangeDetector;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use docver_core::{
    fatal_step, recoverable_step, version, ChangeType, Clock, DocumentId, DocumentMetadata,
    HistoryStore, IdentityProvider, MetadataPatch, MetadataProcessor, VersionError,
    VersionHistoryEntry,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// What a `process_save` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Incremented { previous: String, new: String },
    Skipped(SkipReason),
}

/// Why a save produced no increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another operation on this document is in flight
    AlreadyProcessing,
    /// Not a tracked document type
    UntrackedType,
    /// Within the debounce window of the last increment
    Debounced,
    /// Body content did not change in substance
    Unchanged,
    /// Header could not be parsed; the save itself still succeeded
    HeaderParseFailed,
}

pub struct DocumentVersionService {
    metadata: Arc<dyn MetadataProcessor>,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn HistoryStore>,
    debounce: DebounceTracker,
    detector: FileChangeDetector,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    /// Reentrancy markers, keyed by document
    in_flight: Arc<DashMap<DocumentId, ()>>,
    updates: broadcast::Sender<DocumentId>,
}

/// Scoped reentrancy marker, released on drop (success or failure)
struct ProcessingGuard {
    markers: Arc<DashMap<DocumentId, ()>>,
    document: DocumentId,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.markers.remove(&self.document);
    }
}

impl DocumentVersionService {
    pub fn new(
        metadata: Arc<dyn MetadataProcessor>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let debounce = DebounceTracker::new(store.clone(), clock.clone(), config.debounce_window_ms);
        let detector = FileChangeDetector::new(metadata.clone());
        let (updates, _) = broadcast::channel(64);
        Self {
            metadata,
            identity,
            store,
            debounce,
            detector,
            clock,
            config,
            in_flight: Arc::new(DashMap::new()),
            updates,
        }
    }

    /// Channel of document ids whose version was just updated
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentId> {
        self.updates.subscribe()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn try_acquire(&self, document: &DocumentId) -> Option<ProcessingGuard> {
        use dashmap::mapref::entry::Entry;
        match self.in_flight.entry(document.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(ProcessingGuard {
                    markers: self.in_flight.clone(),
                    document: document.clone(),
                })
            }
        }
    }

    /// Stamp a new tracked document with version 1.0 and owner attribution
    ///
    /// A document whose metadata is already past placeholder defaults is
    /// left alone. The metadata write is fatal; history, state, and baseline
    /// bookkeeping are individually non-fatal.
    pub async fn initialize(&self, document: &DocumentId) -> Result<(), VersionError> {
        const OP: &str = "initialize";

        let Some(_guard) = self.try_acquire(document) else {
            tracing::debug!(%document, "operation already in flight, skipping initialize");
            return Ok(());
        };

        let metadata = match self.metadata.extract(document).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(%document, error = %err, "header unreadable, stamping defaults");
                DocumentMetadata::default()
            }
        };
        if !metadata.is_placeholder() {
            tracing::debug!(%document, version = %metadata.version, "already initialized");
            return Ok(());
        }

        let info = fatal_step(OP, "resolve-identity", document, self.identity.get_user_info().await)?;
        let owner = self.identity.format_owner(&info);
        let now = self.clock.now_ms();

        let patch = MetadataPatch {
            version: Some("1.0".to_string()),
            owner: Some(owner.clone()),
            created_by: Some(owner.clone()),
            last_modified: Some(format_timestamp(now)),
        };
        fatal_step(OP, "persist-metadata", document, self.metadata.update(document, patch).await)?;

        let entry = VersionHistoryEntry::new(
            document.clone(),
            "",
            "1.0",
            now,
            owner.clone(),
            ChangeType::Initialization,
        );
        recoverable_step(OP, "append-history", document, self.store.add_entry(entry).await);
        recoverable_step(
            OP,
            "persist-state",
            document,
            self.persist_state(document, "1.0", &owner).await,
        );
        recoverable_step(
            OP,
            "refresh-baseline",
            document,
            self.detector.update_baseline(document).await,
        );

        let _ = self.updates.send(document.clone());
        tracing::info!(%document, owner = %owner, "document initialized at 1.0");
        Ok(())
    }

    /// React to one observed save of a tracked document
    ///
    /// Short-circuits as a no-op on reentry, untracked types, the debounce
    /// window, an unchanged body, or an unparseable header. Increment,
    /// identity resolution, and the metadata write are fatal; everything
    /// after them is non-fatal bookkeeping.
    pub async fn process_save(&self, document: &DocumentId) -> Result<SaveOutcome, VersionError> {
        const OP: &str = "process_save";

        let Some(_guard) = self.try_acquire(document) else {
            tracing::debug!(%document, "save already being processed, skipping");
            return Ok(SaveOutcome::Skipped(SkipReason::AlreadyProcessing));
        };

        if !self.config.is_tracked(document) {
            tracing::debug!(%document, "untracked document type");
            return Ok(SaveOutcome::Skipped(SkipReason::UntrackedType));
        }

        let eligible = match self.debounce.should_increment(document).await {
            Ok(eligible) => eligible,
            Err(err) => {
                tracing::warn!(%document, error = %err, "debounce state unreadable, treating as eligible");
                true
            }
        };
        if !eligible {
            tracing::debug!(%document, "within debounce window, skipping");
            return Ok(SaveOutcome::Skipped(SkipReason::Debounced));
        }

        let changed = match self.detector.has_body_content_changed(document).await {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!(%document, error = %err, "change detection failed, assuming changed");
                true
            }
        };
        if !changed {
            tracing::debug!(%document, "body unchanged, skipping");
            return Ok(SaveOutcome::Skipped(SkipReason::Unchanged));
        }

        // The save itself already succeeded upstream; a bad header only
        // costs this one version bump.
        let metadata = match self.metadata.extract(document).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(%document, error = %err, "header extraction failed, skipping version bump");
                return Ok(SaveOutcome::Skipped(SkipReason::HeaderParseFailed));
            }
        };

        let raw = metadata.version.clone();
        let was_malformed = !version::is_valid(&raw);
        let current = if was_malformed {
            let normalized = version::normalize(&raw);
            tracing::warn!(%document, found = %raw, %normalized, "malformed stored version normalized");
            normalized
        } else {
            raw.clone()
        };

        let next = fatal_step(OP, "increment", document, version::increment(&current))?;

        let info = fatal_step(OP, "resolve-identity", document, self.identity.get_user_info().await)?;
        let owner = self.identity.format_owner(&info);
        let now = self.clock.now_ms();

        let patch = MetadataPatch {
            version: Some(next.clone()),
            last_modified: Some(format_timestamp(now)),
            ..Default::default()
        };
        fatal_step(OP, "persist-metadata", document, self.metadata.update(document, patch).await)?;

        if was_malformed && !raw.is_empty() {
            let entry = VersionHistoryEntry::new(
                document.clone(),
                raw.clone(),
                current.clone(),
                now,
                owner.clone(),
                ChangeType::Normalization,
            );
            recoverable_step(OP, "append-normalization", document, self.store.add_entry(entry).await);
        }
        let entry = VersionHistoryEntry::new(
            document.clone(),
            current.clone(),
            next.clone(),
            now,
            owner.clone(),
            ChangeType::AutoIncrement,
        );
        recoverable_step(OP, "append-history", document, self.store.add_entry(entry).await);
        recoverable_step(
            OP,
            "persist-state",
            document,
            self.persist_state(document, &next, &owner).await,
        );

        // Always stamp the debounce window and baseline, even if the
        // bookkeeping writes above failed.
        recoverable_step(OP, "record-debounce", document, self.debounce.record_increment(document).await);
        recoverable_step(
            OP,
            "refresh-baseline",
            document,
            self.detector.update_baseline(document).await,
        );

        let _ = self.updates.send(document.clone());
        tracing::info!(%document, previous = %current, new = %next, "version incremented");
        Ok(SaveOutcome::Incremented {
            previous: current,
            new: next,
        })
    }

    /// Put a document back at version 1.0 with current owner attribution
    ///
    /// Idempotent: resetting a document already at 1.0 still succeeds and
    /// still appends a history entry.
    pub async fn reset(&self, document: &DocumentId) -> Result<(), VersionError> {
        const OP: &str = "reset";

        let Some(_guard) = self.try_acquire(document) else {
            tracing::debug!(%document, "operation already in flight, skipping reset");
            return Ok(());
        };

        // Best-effort audit read of whatever is there now
        let previous = self
            .metadata
            .extract(document)
            .await
            .ok()
            .map(|metadata| metadata.version)
            .filter(|version| !version.is_empty())
            .unwrap_or_else(|| "0.0".to_string());

        let info = fatal_step(OP, "resolve-identity", document, self.identity.get_user_info().await)?;
        let owner = self.identity.format_owner(&info);
        let now = self.clock.now_ms();

        let patch = MetadataPatch {
            version: Some("1.0".to_string()),
            owner: Some(owner.clone()),
            last_modified: Some(format_timestamp(now)),
            ..Default::default()
        };
        fatal_step(OP, "persist-metadata", document, self.metadata.update(document, patch).await)?;

        let entry = VersionHistoryEntry::new(
            document.clone(),
            previous.clone(),
            "1.0",
            now,
            owner.clone(),
            ChangeType::Reset,
        );
        recoverable_step(OP, "append-history", document, self.store.add_entry(entry).await);
        recoverable_step(
            OP,
            "persist-state",
            document,
            self.persist_state(document, "1.0", &owner).await,
        );
        // A reset also re-opens the debounce window; the next save may
        // increment immediately.
        recoverable_step(OP, "clear-debounce", document, self.debounce.clear(document).await);
        recoverable_step(
            OP,
            "refresh-baseline",
            document,
            self.detector.update_baseline(document).await,
        );

        let _ = self.updates.send(document.clone());
        tracing::info!(%document, %previous, "document reset to 1.0");
        Ok(())
    }

    /// Stamp an explicit version chosen by the user
    ///
    /// The requested value is normalized first, so a malformed request never
    /// fails; it lands wherever normalization puts it. Returns `None` when
    /// another operation on the document is in flight.
    pub async fn set_version(
        &self,
        document: &DocumentId,
        requested: &str,
    ) -> Result<Option<String>, VersionError> {
        const OP: &str = "set_version";

        let Some(_guard) = self.try_acquire(document) else {
            tracing::debug!(%document, "operation already in flight, skipping set_version");
            return Ok(None);
        };

        let normalized = version::normalize(requested);
        if !version::is_valid(requested) {
            tracing::warn!(%document, requested, %normalized, "manual version normalized");
        }

        let previous = self
            .metadata
            .extract(document)
            .await
            .ok()
            .map(|metadata| metadata.version)
            .unwrap_or_default();

        let info = fatal_step(OP, "resolve-identity", document, self.identity.get_user_info().await)?;
        let owner = self.identity.format_owner(&info);
        let now = self.clock.now_ms();

        let patch = MetadataPatch {
            version: Some(normalized.clone()),
            last_modified: Some(format_timestamp(now)),
            ..Default::default()
        };
        fatal_step(OP, "persist-metadata", document, self.metadata.update(document, patch).await)?;

        let entry = VersionHistoryEntry::new(
            document.clone(),
            previous,
            normalized.clone(),
            now,
            owner.clone(),
            ChangeType::ManualSet,
        );
        recoverable_step(OP, "append-history", document, self.store.add_entry(entry).await);
        recoverable_step(
            OP,
            "persist-state",
            document,
            self.persist_state(document, &normalized, &owner).await,
        );
        recoverable_step(
            OP,
            "refresh-baseline",
            document,
            self.detector.update_baseline(document).await,
        );

        let _ = self.updates.send(document.clone());
        tracing::info!(%document, version = %normalized, "version set manually");
        Ok(Some(normalized))
    }

    /// Current header metadata, or `None` when nothing readable is tracked
    pub async fn get_metadata(&self, document: &DocumentId) -> Option<DocumentMetadata> {
        self.metadata.extract(document).await.ok()
    }

    /// Audit trail, oldest first; empty when nothing is tracked
    pub async fn get_history(&self, document: &DocumentId) -> Vec<VersionHistoryEntry> {
        self.store.get_history(document).await.unwrap_or_default()
    }

    /// Write version/owner into the persisted state without touching the
    /// history or the debounce stamp
    async fn persist_state(
        &self,
        document: &DocumentId,
        version: &str,
        owner: &str,
    ) -> Result<(), VersionError> {
        let mut state = self
            .store
            .get_document_state(document)
            .await?
            .unwrap_or_default();
        state.current_version = version.to_string();
        state.owner = owner.to_string();
        if state.created_by.is_empty() {
            state.created_by = owner.to_string();
        }
        self.store.update_document_state(document, state).await
    }
}

fn format_timestamp(ms: u64) -> String {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
