//! Tool descriptors.

use std::path::PathBuf;

use crate::shell::Invocation;

/// How a tool's presence is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceCheck {
    /// An executable resolvable on the search path.
    Executable(String),
    /// A file at a fixed location (shell-function tools such as nvm).
    File(PathBuf),
}

/// A named external capability.
///
/// Descriptors are stateless: they only say how to look at, install and
/// upgrade a tool. All state lives on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    /// Display name.
    pub name: String,
    /// Presence test.
    pub presence: PresenceCheck,
    /// Command printing a version string.
    pub version_query: Option<Invocation>,
    /// Command installing the tool.
    pub install: Option<Invocation>,
    /// Command upgrading an installed tool.
    pub upgrade: Option<Invocation>,
    /// Directories holding the tool's executables once installed.
    pub bin_dirs: Vec<PathBuf>,
}

impl Tool {
    /// An executable tool queried with `<name> --version`.
    pub fn executable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            presence: PresenceCheck::Executable(name.to_string()),
            version_query: Some(Invocation::new(name, ["--version"])),
            install: None,
            upgrade: None,
            bin_dirs: Vec::new(),
        }
    }

    /// A tool detected by a marker file.
    pub fn file(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            presence: PresenceCheck::File(path.into()),
            version_query: None,
            install: None,
            upgrade: None,
            bin_dirs: Vec::new(),
        }
    }

    /// Override the version query.
    pub fn with_version_query(mut self, query: Invocation) -> Self {
        self.version_query = Some(query);
        self
    }

    /// Set the install action.
    pub fn with_install(mut self, install: Invocation) -> Self {
        self.install = Some(install);
        self
    }

    /// Set the upgrade action.
    pub fn with_upgrade(mut self, upgrade: Invocation) -> Self {
        self.upgrade = Some(upgrade);
        self
    }

    /// Declare a directory to make searchable once installed.
    pub fn publishes(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dirs.push(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_defaults_version_query() {
        let tool = Tool::executable("git");
        assert_eq!(tool.presence, PresenceCheck::Executable("git".to_string()));
        assert_eq!(tool.version_query.unwrap().display(), "git --version");
        assert!(tool.install.is_none());
    }

    #[test]
    fn file_tool_has_no_default_query() {
        let tool = Tool::file("nvm", "/home/dev/.nvm/nvm.sh");
        assert!(tool.version_query.is_none());
    }

    #[test]
    fn builder_sets_actions() {
        let tool = Tool::executable("pnpm")
            .with_install(Invocation::new("npm", ["install", "-g", "pnpm"]))
            .with_upgrade(Invocation::new("npm", ["install", "-g", "pnpm@latest"]))
            .publishes("/opt/bin");
        assert_eq!(tool.install.unwrap().display(), "npm install -g pnpm");
        assert_eq!(tool.upgrade.unwrap().display(), "npm install -g pnpm@latest");
        assert_eq!(tool.bin_dirs, vec![PathBuf::from("/opt/bin")]);
    }
}
