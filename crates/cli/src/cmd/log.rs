//! Show a document's version history

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path, limit: Option<usize>) -> Result<()> {
    let root = util::find_repo_root()?;
    let service = util::open_service(&root)?;
    let document = util::document_id(path)?;

    let history = service.get_history(&document).await;
    if history.is_empty() {
        println!("No history for {}", path.display());
        return Ok(());
    }

    let limit = limit.unwrap_or(20);
    let start = history.len().saturating_sub(limit);

    // Newest first
    for entry in history[start..].iter().rev() {
        let transition = if entry.previous_version.is_empty() {
            format!("-> {}", entry.new_version)
        } else {
            format!("{} -> {}", entry.previous_version, entry.new_version)
        };
        println!(
            "{} {} {} by {} - {}",
            util::format_relative_time(entry.timestamp_ms).dimmed(),
            entry.change_type.as_str().cyan(),
            transition.yellow(),
            entry.author,
            util::format_absolute_time(entry.timestamp_ms).dimmed()
        );
    }
    Ok(())
}
