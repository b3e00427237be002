//! Collaborator contracts
//!
//! The orchestrator owns no durable state; everything below the decision
//! phase goes through these traits. Implementations live in sibling crates
//! (frontmatter header processor, git identity, sled-backed history store)
//! and tests substitute their own.

use crate::error::VersionError;
use crate::model::{
    DocumentId, DocumentMetadata, DocumentState, MetadataPatch, UserInfo, VersionHistoryEntry,
};
use async_trait::async_trait;

/// Reads and rewrites the structured metadata header of a document
#[async_trait]
pub trait MetadataProcessor: Send + Sync {
    /// Parse the header into metadata
    ///
    /// Fails with [`VersionError::Parse`] on malformed header syntax. A
    /// document with no header at all is not an error; it yields placeholder
    /// defaults.
    async fn extract(&self, document: &DocumentId) -> Result<DocumentMetadata, VersionError>;

    /// Merge the patch into the header, rewriting it in place
    ///
    /// Unrelated header fields and the body are preserved verbatim.
    async fn update(&self, document: &DocumentId, patch: MetadataPatch)
        -> Result<(), VersionError>;

    /// Document content excluding the structured header
    async fn extract_body_content(&self, document: &DocumentId) -> Result<String, VersionError>;
}

/// Resolves the author identity used for owner attribution
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current user, falling back to an OS-derived identity
    async fn get_user_info(&self) -> Result<UserInfo, VersionError>;

    /// Canonical owner string: `Name <email>`
    fn format_owner(&self, info: &UserInfo) -> String {
        format!("{} <{}>", info.name, info.email)
    }

    /// Diagnostics only; never gates control flow
    async fn is_git_configured(&self) -> bool;
}

/// Durable per-document state and audit trail
///
/// Treated as an eventually-consistent per-document key-value store; no
/// multi-document transactions. The store enforces the history FIFO cap,
/// and callers tolerate truncation.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get_document_state(
        &self,
        document: &DocumentId,
    ) -> Result<Option<DocumentState>, VersionError>;

    async fn update_document_state(
        &self,
        document: &DocumentId,
        state: DocumentState,
    ) -> Result<(), VersionError>;

    /// Append an entry, evicting the oldest once the cap is reached
    async fn add_entry(&self, entry: VersionHistoryEntry) -> Result<(), VersionError>;

    async fn get_history(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<VersionHistoryEntry>, VersionError>;

    async fn clear_history(&self, document: &DocumentId) -> Result<(), VersionError>;
}
