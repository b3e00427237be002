//! Process one save of a tracked document

use crate::util;
use anyhow::Result;
use docver_service::{SaveOutcome, SkipReason};
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    let root = util::find_repo_root()?;
    let service = util::open_service(&root)?;
    let document = util::document_id(path)?;

    match service.process_save(&document).await? {
        SaveOutcome::Incremented { previous, new } => {
            println!(
                "{} {} {} -> {}",
                "Incremented".green(),
                path.display(),
                previous.dimmed(),
                new.yellow()
            );
        }
        SaveOutcome::Skipped(reason) => {
            let why = match reason {
                SkipReason::AlreadyProcessing => "another operation is in flight",
                SkipReason::UntrackedType => "not a tracked document type",
                SkipReason::Debounced => "within the debounce window",
                SkipReason::Unchanged => "body content unchanged",
                SkipReason::HeaderParseFailed => "header could not be parsed",
            };
            println!("{} {} ({})", "Skipped".dimmed(), path.display(), why);
        }
    }
    Ok(())
}
