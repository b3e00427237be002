//! Data model for tracked documents and their version history

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use ulid::Ulid;

/// Maximum number of history entries retained per document (FIFO eviction)
pub const HISTORY_CAP: usize = 50;

/// Opaque per-document key
///
/// The CLI uses the canonicalized file path; any stable string works.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id from a filesystem path
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension of the underlying path, if the id is path-shaped
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.0).extension().and_then(|e| e.to_str())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured-header metadata owned by a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub version: String,
    pub owner: String,
    pub last_modified: Option<String>,
    pub created_by: Option<String>,
}

impl DocumentMetadata {
    /// True when the document has never been stamped by this subsystem
    pub fn is_placeholder(&self) -> bool {
        self.version.is_empty() || self.version == "0.0" || self.owner.is_empty()
    }
}

/// Partial metadata write: only `Some` fields are touched
#[derive(Debug, Clone, Default)]
pub struct MetadataPatch {
    pub version: Option<String>,
    pub owner: Option<String>,
    pub last_modified: Option<String>,
    pub created_by: Option<String>,
}

/// Why a version transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    AutoIncrement,
    ManualSet,
    Initialization,
    Normalization,
    Reset,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::AutoIncrement => "auto-increment",
            ChangeType::ManualSet => "manual-set",
            ChangeType::Initialization => "initialization",
            ChangeType::Normalization => "normalization",
            ChangeType::Reset => "reset",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One version transition in a document's audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionHistoryEntry {
    /// Unique entry id (ULID: timestamp + uniqueness)
    pub id: Ulid,
    pub document_id: DocumentId,
    pub previous_version: String,
    pub new_version: String,
    /// Unix milliseconds
    pub timestamp_ms: u64,
    pub author: String,
    pub change_type: ChangeType,
}

impl VersionHistoryEntry {
    pub fn new(
        document_id: DocumentId,
        previous_version: impl Into<String>,
        new_version: impl Into<String>,
        timestamp_ms: u64,
        author: impl Into<String>,
        change_type: ChangeType,
    ) -> Self {
        Self {
            id: Ulid::new(),
            document_id,
            previous_version: previous_version.into(),
            new_version: new_version.into(),
            timestamp_ms,
            author: author.into(),
            change_type,
        }
    }
}

/// Persisted per-document state, owned by the history store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentState {
    pub current_version: String,
    pub owner: String,
    pub created_by: String,
    /// Append-only, time-ordered, capped at [`HISTORY_CAP`] entries
    pub history: Vec<VersionHistoryEntry>,
    /// Last successful increment (unix ms), used by the debounce gate
    pub last_increment_ts_ms: Option<u64>,
}

/// Resolved author identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_detection() {
        assert!(DocumentMetadata::default().is_placeholder());
        assert!(DocumentMetadata {
            version: "0.0".to_string(),
            owner: "Someone <s@example.com>".to_string(),
            ..Default::default()
        }
        .is_placeholder());
        assert!(!DocumentMetadata {
            version: "1.0".to_string(),
            owner: "Someone <s@example.com>".to_string(),
            ..Default::default()
        }
        .is_placeholder());
    }

    #[test]
    fn test_change_type_serialization() {
        let json = serde_json::to_string(&ChangeType::AutoIncrement).unwrap();
        assert_eq!(json, "\"auto-increment\"");
        let json = serde_json::to_string(&ChangeType::ManualSet).unwrap();
        assert_eq!(json, "\"manual-set\"");
    }

    #[test]
    fn test_document_id_extension() {
        assert_eq!(DocumentId::new("/docs/guide.md").extension(), Some("md"));
        assert_eq!(DocumentId::new("no-extension").extension(), None);
    }
}
