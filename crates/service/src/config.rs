//! Service configuration

use crate::debounce::DEBOUNCE_WINDOW_MS;
use anyhow::{Context, Result};
use docver_core::{DocumentId, HISTORY_CAP};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// File extensions treated as tracked documents
    pub tracked_extensions: Vec<String>,
    /// Minimum elapsed time between accepted increments (ms)
    pub debounce_window_ms: u64,
    /// History entries retained per document
    pub history_cap: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tracked_extensions: vec![
                "md".to_string(),
                "markdown".to_string(),
                "txt".to_string(),
            ],
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            history_cap: HISTORY_CAP,
        }
    }
}

impl ServiceConfig {
    pub fn is_tracked(&self, document: &DocumentId) -> bool {
        document
            .extension()
            .map(|ext| {
                self.tracked_extensions
                    .iter()
                    .any(|tracked| tracked.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Load from a TOML file, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }
}
