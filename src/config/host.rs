//! Host locations the engine reads and writes.

use std::path::{Path, PathBuf};

use crate::config::schema::Settings;
use crate::error::{RigupError, Result};

/// Resolved host directories.
///
/// Resolved once per process; every component receives paths from here
/// rather than consulting the environment or the working directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    /// The user's home directory.
    pub home: PathBuf,
    /// Runtime manager root (`NVM_DIR`).
    pub nvm_dir: PathBuf,
    /// Directory the engine was invoked for.
    pub project_dir: PathBuf,
    /// Per-user data directory for rigup (git checkouts).
    pub data_dir: PathBuf,
}

impl HostLayout {
    /// Build a layout rooted at an explicit home directory.
    pub fn new(home: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            nvm_dir: home.join(".nvm"),
            data_dir: home.join(".local/share/rigup"),
            project_dir: project_dir.into(),
            home,
        }
    }

    /// Discover the layout from the real environment.
    pub fn discover(project_dir: Option<&Path>) -> Result<Self> {
        Self::discover_with_env(project_dir, |key| std::env::var(key))
    }

    /// Discover with a custom env var lookup function.
    pub fn discover_with_env<F>(project_dir: Option<&Path>, env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let home = dirs::home_dir().ok_or_else(|| RigupError::ConfigValidationError {
            message: "cannot determine the home directory (is HOME set?)".to_string(),
        })?;
        let project_dir = match project_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let mut layout = Self::new(home, project_dir);
        if let Ok(nvm_dir) = env_fn("NVM_DIR") {
            if !nvm_dir.trim().is_empty() {
                layout.nvm_dir = PathBuf::from(nvm_dir);
            }
        }
        Ok(layout)
    }

    /// The user-scope registry document.
    pub fn user_document(&self, settings: &Settings) -> PathBuf {
        self.home.join(&settings.app.user_document)
    }

    /// The project-scope registry document.
    pub fn project_document(&self, settings: &Settings) -> PathBuf {
        self.project_dir.join(&settings.app.project_document)
    }

    /// Where a git-sourced application is checked out.
    pub fn checkout_dir(&self, settings: &Settings) -> PathBuf {
        self.data_dir.join("src").join(&settings.app.command)
    }
}
