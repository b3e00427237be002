//! Document version bookkeeping service
//!
//! This crate provides:
//! - [`DocumentVersionService`]: the initialize / process-save / reset
//!   orchestrator with per-document reentrancy guarding
//! - [`DebounceTracker`]: temporal admission gate over persisted state
//! - [`FileChangeDetector`]: body-content change oracle with in-memory
//!   baselines
//! - [`FrontmatterProcessor`]: structured-header metadata collaborator
//! - [`GitIdentityProvider`]: author resolution via git config with an
//!   OS-derived fallback

pub mod config;
pub mod debounce;
pub mod detect;
pub mod header;
pub mod identity;
pub mod service;

// Re-exports
pub use config::ServiceConfig;
pub use debounce::{DebounceTracker, DEBOUNCE_WINDOW_MS};
pub use detect::FileChangeDetector;
pub use header::FrontmatterProcessor;
pub use identity::GitIdentityProvider;
pub use service::{DocumentVersionService, SaveOutcome, SkipReason};
