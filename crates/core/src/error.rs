//! Error taxonomy for version-tracking operations
//!
//! Fatal vs. non-fatal is a property of the *step*, not the error kind: a
//! persistence failure aborts the workflow when it hits the primary metadata
//! write, but is only logged when it hits a secondary bookkeeping write.
//! See [`crate::step`] for how the orchestrator applies that policy.

use crate::model::DocumentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    /// Malformed structured header; recoverable, skip-and-log
    #[error("malformed header in {document}: {reason}")]
    Parse { document: DocumentId, reason: String },

    /// Malformed version string; recoverable via normalization
    #[error("invalid version string {value:?}: {reason}")]
    Validation { value: String, reason: String },

    /// Cannot resolve an author; fatal for write-causing operations
    #[error("could not resolve author identity: {0}")]
    Identity(String),

    /// A collaborator failed to read or write durable state
    #[error("persistence failure in {context}: {reason}")]
    Persistence { context: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VersionError {
    pub fn parse(document: DocumentId, reason: impl Into<String>) -> Self {
        Self::Parse {
            document,
            reason: reason.into(),
        }
    }

    pub fn persistence(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Persistence {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}
