//! Shared contracts for document version bookkeeping
//!
//! This crate provides:
//! - Version string validation, normalization, and incrementing (pure)
//! - Data model: metadata, history entries, persisted document state
//! - Error taxonomy and per-step fatality handling
//! - Collaborator traits (metadata, identity, history store)
//! - Clock abstraction for testable time-based policies

pub mod clock;
pub mod error;
pub mod model;
pub mod step;
pub mod traits;
pub mod version;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use error::VersionError;
pub use model::{
    ChangeType, DocumentId, DocumentMetadata, DocumentState, MetadataPatch, UserInfo,
    VersionHistoryEntry, HISTORY_CAP,
};
pub use step::{fatal_step, recoverable_step, run_step, Fatality, StepOutcome};
pub use traits::{HistoryStore, IdentityProvider, MetadataProcessor};

/// Result type for version-tracking operations
pub type Result<T> = std::result::Result<T, VersionError>;
