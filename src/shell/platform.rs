//! Platform-specific shell detection.

use std::path::{Path, PathBuf};

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            _ => ShellType::Unknown,
        }
    }

    /// Detect the interactive shell from `SHELL`.
    pub fn detect() -> Self {
        Self::detect_with_env(|key| std::env::var(key))
    }

    /// Detect with a custom env var lookup function.
    pub fn detect_with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        env_fn("SHELL")
            .map(|s| Self::from_executable(&s))
            .unwrap_or(ShellType::Unknown)
    }

    /// Startup file that activation lines are persisted into.
    ///
    /// Fish cannot source POSIX `export` lines, so it falls back to
    /// `~/.profile` like any other shell.
    pub fn startup_file(&self, home: &Path) -> PathBuf {
        match self {
            ShellType::Bash => home.join(".bashrc"),
            ShellType::Zsh => home.join(".zshrc"),
            ShellType::Fish | ShellType::Unknown => home.join(".profile"),
        }
    }

    /// Command the user runs to pick up persisted changes.
    pub fn reload_hint(&self, home: &Path) -> String {
        format!("source {}", self.startup_file(home).display())
    }
}

/// Every POSIX startup file the engine may read or rewrite.
pub fn startup_files(home: &Path) -> Vec<PathBuf> {
    [
        ".bashrc",
        ".bash_profile",
        ".zshrc",
        ".zprofile",
        ".profile",
    ]
    .iter()
    .map(|name| home.join(name))
    .collect()
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
