//! Show repository configuration and identity diagnostics

use crate::util;
use anyhow::Result;
use docver_core::IdentityProvider;
use docver_service::GitIdentityProvider;
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let root = util::find_repo_root()?;
    let config = util::load_config(&root)?;

    println!("{}", "Repository Configuration".bold());
    println!(
        "{}: {}\n",
        "Location".dimmed(),
        root.join(util::REPO_DIR).display().to_string().dimmed()
    );

    println!(
        "  {} = {}",
        "tracked_extensions".cyan(),
        config.tracked_extensions.join(", ")
    );
    println!(
        "  {} = {} {}",
        "debounce_window_ms".cyan(),
        config.debounce_window_ms,
        format!("({}s)", config.debounce_window_ms / 1000).dimmed()
    );
    println!("  {} = {}", "history_cap".cyan(), config.history_cap);

    // Identity diagnostics; never gates any workflow
    let identity = GitIdentityProvider::with_working_dir(root.clone());
    let configured = identity.is_git_configured().await;
    let info = identity.get_user_info().await?;
    println!();
    println!(
        "  {} = {}",
        "git_configured".cyan(),
        if configured {
            "yes".green().to_string()
        } else {
            "no (using OS fallback)".yellow().to_string()
        }
    );
    println!("  {} = {}", "identity".cyan(), identity.format_owner(&info));
    Ok(())
}
