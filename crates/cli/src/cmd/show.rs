//! Show a document's current metadata

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path, json: bool) -> Result<()> {
    let root = util::find_repo_root()?;
    let service = util::open_service(&root)?;
    let document = util::document_id(path)?;

    let Some(metadata) = service.get_metadata(&document).await else {
        println!("{} {} is not tracked", "Note:".yellow(), path.display());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", path.display().to_string().bold());
    println!("  {} = {}", "version".cyan(), metadata.version.yellow());
    println!("  {} = {}", "owner".cyan(), metadata.owner);
    if let Some(created_by) = &metadata.created_by {
        println!("  {} = {}", "created_by".cyan(), created_by);
    }
    if let Some(last_modified) = &metadata.last_modified {
        println!("  {} = {}", "last_modified".cyan(), last_modified.dimmed());
    }
    Ok(())
}
