//! Author identity resolution
//!
//! Prefers `git config user.name` / `user.email`; falls back to an
//! OS-derived identity so owner attribution never blocks a workflow on an
//! unconfigured machine.

use async_trait::async_trait;
use docver_core::{IdentityProvider, UserInfo, VersionError};
use std::path::PathBuf;
use tokio::process::Command;

#[derive(Debug, Default, Clone)]
pub struct GitIdentityProvider {
    /// Directory to resolve repo-local git config from
    working_dir: Option<PathBuf>,
}

impl GitIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(working_dir: PathBuf) -> Self {
        Self {
            working_dir: Some(working_dir),
        }
    }

    async fn git_config(&self, key: &str) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(["config", "--get", key]);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        let output = cmd.output().await.ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    fn os_user() -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

#[async_trait]
impl IdentityProvider for GitIdentityProvider {
    async fn get_user_info(&self) -> Result<UserInfo, VersionError> {
        let name = self.git_config("user.name").await;
        let email = self.git_config("user.email").await;

        let user = Self::os_user();
        Ok(UserInfo {
            name: name.unwrap_or_else(|| user.clone()),
            email: email.unwrap_or_else(|| format!("{}@localhost", user)),
        })
    }

    async fn is_git_configured(&self) -> bool {
        self.git_config("user.name").await.is_some()
            && self.git_config("user.email").await.is_some()
    }
}
