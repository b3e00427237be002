//! Reset a document to version 1.0

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    let root = util::find_repo_root()?;
    let service = util::open_service(&root)?;
    let document = util::document_id(path)?;

    service.reset(&document).await?;

    let metadata = service.get_metadata(&document).await.unwrap_or_default();
    println!(
        "{} {} to version {}",
        "Reset".green(),
        path.display(),
        metadata.version.yellow()
    );
    println!("  owner: {}", metadata.owner.cyan());
    Ok(())
}
