//! Start tracking a document

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    let root = util::find_or_create_repo_root()?;
    let service = util::open_service(&root)?;

    if !path.exists() {
        std::fs::write(path, "")?;
        println!("Created {}", path.display());
    }

    let document = util::document_id(path)?;
    service.initialize(&document).await?;

    let metadata = service
        .get_metadata(&document)
        .await
        .unwrap_or_default();

    println!(
        "{} {} at version {}",
        "Tracking".green(),
        path.display(),
        metadata.version.yellow()
    );
    println!("  owner: {}", metadata.owner.cyan());
    Ok(())
}
