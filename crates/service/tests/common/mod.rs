//! Shared fixtures for workflow tests

use async_trait::async_trait;
use docver_core::{
    Clock, DocumentId, DocumentMetadata, DocumentState, HistoryStore, IdentityProvider,
    MetadataPatch, MetadataProcessor, UserInfo, VersionError, VersionHistoryEntry,
};
use docver_journal::SledHistoryStore;
use docver_service::{DocumentVersionService, FrontmatterProcessor, ServiceConfig};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_OWNER: &str = "Test User <test@example.com>";

pub struct ManualClock(Mutex<u64>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Mutex::new(start_ms))
    }

    pub fn advance(&self, ms: u64) {
        *self.0.lock() += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        *self.0.lock()
    }
}

/// Identity provider with a fixed answer, no git involved
pub struct FixedIdentity;

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn get_user_info(&self) -> Result<UserInfo, VersionError> {
        Ok(UserInfo {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        })
    }

    async fn is_git_configured(&self) -> bool {
        false
    }
}

/// Identity provider that always fails, for fatal-step tests
pub struct BrokenIdentity;

#[async_trait]
impl IdentityProvider for BrokenIdentity {
    async fn get_user_info(&self) -> Result<UserInfo, VersionError> {
        Err(VersionError::Identity("no identity available".to_string()))
    }

    async fn is_git_configured(&self) -> bool {
        false
    }
}

/// Store wrapper that rejects history appends but delegates everything else
pub struct FailingEntryStore(pub Arc<SledHistoryStore>);

#[async_trait]
impl HistoryStore for FailingEntryStore {
    async fn get_document_state(
        &self,
        document: &DocumentId,
    ) -> Result<Option<DocumentState>, VersionError> {
        self.0.get_document_state(document).await
    }

    async fn update_document_state(
        &self,
        document: &DocumentId,
        state: DocumentState,
    ) -> Result<(), VersionError> {
        self.0.update_document_state(document, state).await
    }

    async fn add_entry(&self, _entry: VersionHistoryEntry) -> Result<(), VersionError> {
        Err(VersionError::persistence("test", "injected append failure"))
    }

    async fn get_history(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<VersionHistoryEntry>, VersionError> {
        self.0.get_history(document).await
    }

    async fn clear_history(&self, document: &DocumentId) -> Result<(), VersionError> {
        self.0.clear_history(document).await
    }
}

/// Processor wrapper that yields during body extraction, so overlapping
/// saves reliably interleave
pub struct SlowBodyProcessor(pub FrontmatterProcessor);

#[async_trait]
impl MetadataProcessor for SlowBodyProcessor {
    async fn extract(&self, document: &DocumentId) -> Result<DocumentMetadata, VersionError> {
        self.0.extract(document).await
    }

    async fn update(
        &self,
        document: &DocumentId,
        patch: MetadataPatch,
    ) -> Result<(), VersionError> {
        self.0.update(document, patch).await
    }

    async fn extract_body_content(&self, document: &DocumentId) -> Result<String, VersionError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.0.extract_body_content(document).await
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub service: DocumentVersionService,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            |processor| processor,
            |store| store as Arc<dyn HistoryStore>,
        )
    }

    pub fn build(
        wrap_processor: impl FnOnce(Arc<dyn MetadataProcessor>) -> Arc<dyn MetadataProcessor>,
        wrap_store: impl FnOnce(Arc<SledHistoryStore>) -> Arc<dyn HistoryStore>,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SledHistoryStore::open(&dir.path().join("store")).unwrap());
        let clock = Arc::new(ManualClock::new(1_000_000_000));
        let processor = wrap_processor(Arc::new(FrontmatterProcessor::new()));
        let service = DocumentVersionService::new(
            processor,
            Arc::new(FixedIdentity),
            wrap_store(store.clone()),
            clock.clone(),
            ServiceConfig::default(),
        );
        Self {
            dir,
            service,
            clock,
        }
    }

    /// Create a document file and return its id
    pub fn doc(&self, name: &str, content: &str) -> DocumentId {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        DocumentId::from_path(&path)
    }

    pub fn read(&self, document: &DocumentId) -> String {
        std::fs::read_to_string(document.as_str()).unwrap()
    }

    /// Rewrite only the body, leaving the header bytes alone
    pub fn replace_body(&self, document: &DocumentId, body: &str) {
        let path = PathBuf::from(document.as_str());
        let content = std::fs::read_to_string(&path).unwrap();
        let header_end = header_end(&content);
        let mut out = content[..header_end].to_string();
        out.push_str(body);
        std::fs::write(&path, out).unwrap();
    }
}

/// Byte offset just past the closing header delimiter (0 when no header)
fn header_end(content: &str) -> usize {
    if !content.starts_with("---\n") && !content.starts_with("---\r\n") {
        return 0;
    }
    let mut offset = 0usize;
    for (i, line) in content.split_inclusive('\n').enumerate() {
        offset += line.len();
        if i > 0 && line.trim_end() == "---" {
            return offset;
        }
    }
    content.len()
}
