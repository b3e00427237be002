//! Durable per-document version state
//!
//! This crate provides the sled-backed [`HistoryStore`] implementation:
//! - One record per document (version, owner, audit trail, debounce stamp)
//! - Append-only history with FIFO cap enforcement at write time
//! - Flush-after-write durability
//!
//! [`HistoryStore`]: docver_core::HistoryStore

pub mod store;

// Re-exports
pub use store::SledHistoryStore;
