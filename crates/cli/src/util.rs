//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use docver_core::{DocumentId, SystemClock};
use docver_journal::SledHistoryStore;
use docver_service::{
    DocumentVersionService, FrontmatterProcessor, GitIdentityProvider, ServiceConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Repository state directory name
pub const REPO_DIR: &str = ".dv";

/// Find repository root by walking up from cwd to find .dv/
pub fn find_repo_root() -> Result<PathBuf> {
    let mut current = std::env::current_dir().context("Failed to get current directory")?;

    loop {
        let dv_dir = current.join(REPO_DIR);
        if dv_dir.exists() && dv_dir.is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => anyhow::bail!("Not a docver repository (no {} directory found)", REPO_DIR),
        }
    }
}

/// Find the repository root, creating .dv/ at cwd when none exists
pub fn find_or_create_repo_root() -> Result<PathBuf> {
    if let Ok(root) = find_repo_root() {
        return Ok(root);
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    std::fs::create_dir_all(cwd.join(REPO_DIR))
        .with_context(|| format!("Failed to create {} directory", REPO_DIR))?;
    Ok(cwd)
}

/// Load the repository config
pub fn load_config(root: &Path) -> Result<ServiceConfig> {
    ServiceConfig::load(&root.join(REPO_DIR).join("config.toml"))
}

/// Wire up the service with its concrete collaborators
pub fn open_service(root: &Path) -> Result<DocumentVersionService> {
    let config = load_config(root)?;
    let store = SledHistoryStore::open(&root.join(REPO_DIR))
        .context("Failed to open history store")?
        .with_history_cap(config.history_cap);

    Ok(DocumentVersionService::new(
        Arc::new(FrontmatterProcessor::new()),
        Arc::new(GitIdentityProvider::with_working_dir(root.to_path_buf())),
        Arc::new(store),
        Arc::new(SystemClock),
        config,
    ))
}

/// Canonical document id for a path
pub fn document_id(path: &Path) -> Result<DocumentId> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("No such document: {}", path.display()))?;
    Ok(DocumentId::from_path(&canonical))
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let datetime = UNIX_EPOCH + Duration::from_millis(ts_ms);

    if let Ok(elapsed) = SystemTime::now().duration_since(datetime) {
        let seconds = elapsed.as_secs();

        if seconds < 60 {
            format!("{} seconds ago", seconds)
        } else if seconds < 3600 {
            format!("{} minutes ago", seconds / 60)
        } else if seconds < 86400 {
            format!("{} hours ago", seconds / 3600)
        } else if seconds < 604800 {
            format!("{} days ago", seconds / 86400)
        } else {
            format!("{} weeks ago", seconds / 604800)
        }
    } else {
        "in the future".to_string()
    }
}

/// Format timestamp as absolute UTC time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    use chrono::{TimeZone, Utc};

    Utc.timestamp_millis_opt(ts_ms as i64)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        let result = format_relative_time(now_ms);
        assert!(result.contains("seconds ago"));

        let one_hour_ago = now_ms - (3600 * 1000);
        assert!(format_relative_time(one_hour_ago).contains("hour"));

        let one_day_ago = now_ms - (86400 * 1000);
        assert!(format_relative_time(one_day_ago).contains("day"));
    }

    #[test]
    fn test_format_absolute_time() {
        // 2024-01-03 14:30:00 UTC
        assert_eq!(format_absolute_time(1_704_292_200_000), "2024-01-03 14:30:00");
    }
}
