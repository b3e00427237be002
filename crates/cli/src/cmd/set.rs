//! Set an explicit document version

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path, version: &str) -> Result<()> {
    let root = util::find_repo_root()?;
    let service = util::open_service(&root)?;
    let document = util::document_id(path)?;

    match service.set_version(&document, version).await? {
        Some(stamped) => {
            if stamped != version {
                println!(
                    "{} normalized {} to {}",
                    "Note:".yellow(),
                    version.dimmed(),
                    stamped.yellow()
                );
            }
            println!("{} {} at version {}", "Set".green(), path.display(), stamped.yellow());
        }
        None => {
            println!("{} another operation is in flight", "Skipped".dimmed());
        }
    }
    Ok(())
}
