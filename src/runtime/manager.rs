//! Multi-version runtime manager commands.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths::PathRegistry;
use crate::shell::{quote, CommandRunner, Invocation};

/// Builds the runtime manager's shell invocations.
///
/// The manager only exists as a shell function, so every command sources
/// `nvm.sh` first.
#[derive(Debug, Clone)]
pub struct RuntimeManager {
    nvm_dir: PathBuf,
    search_path: Option<String>,
}

impl RuntimeManager {
    /// Manage the installation rooted at `nvm_dir`.
    pub fn new(nvm_dir: impl Into<PathBuf>) -> Self {
        Self {
            nvm_dir: nvm_dir.into(),
            search_path: None,
        }
    }

    /// Run commands with the registry's search path.
    pub fn with_search_path(mut self, paths: &PathRegistry) -> Self {
        self.search_path = Some(paths.to_env_value().to_string_lossy().into_owned());
        self
    }

    /// The manager root.
    pub fn nvm_dir(&self) -> &Path {
        &self.nvm_dir
    }

    /// Run `command` with the manager sourced.
    pub fn command(&self, command: &str) -> Invocation {
        let source = self.nvm_dir.join("nvm.sh");
        let inv = Invocation::shell(format!(
            ". {} && {}",
            quote(&source.to_string_lossy()),
            command
        ))
        .with_env("NVM_DIR", self.nvm_dir.to_string_lossy());
        match &self.search_path {
            Some(path) => inv.with_env("PATH", path.clone()),
            None => inv,
        }
    }

    /// Install the latest release of `major`.
    pub fn install(&self, major: u32) -> Invocation {
        self.command(&format!("nvm install {}", major))
    }

    /// Make `major` the default for new shells.
    pub fn set_default(&self, major: u32) -> Invocation {
        self.command(&format!("nvm alias default {}", major))
    }

    /// Print the installed version matching `major`.
    pub fn installed_version(&self, major: u32) -> Invocation {
        self.command(&format!("nvm version {}", major))
    }

    /// Print the version new shells will use.
    pub fn default_version(&self) -> Invocation {
        self.command("nvm version default")
    }

    /// Bin directory of an installed version (e.g. `v20.11.1`).
    pub fn bin_dir(&self, version: &str) -> PathBuf {
        self.nvm_dir.join("versions/node").join(version).join("bin")
    }

    /// Query a version, treating `N/A` and failures as absent.
    pub fn query(&self, runner: &dyn CommandRunner, invocation: &Invocation) -> Result<Option<String>> {
        let result = runner.run(invocation)?;
        if !result.success {
            return Ok(None);
        }
        Ok(result
            .output()
            .and_then(|out| out.lines().last())
            .map(str::trim)
            .filter(|v| v.starts_with('v') && v[1..].starts_with(|c: char| c.is_ascii_digit()))
            .map(str::to_string))
    }

    /// The current default version, if one is configured.
    pub fn current_default(&self, runner: &dyn CommandRunner) -> Option<String> {
        match self.query(runner, &self.default_version()) {
            Ok(version) => version,
            Err(e) => {
                tracing::debug!("could not read default runtime version: {}", e);
                None
            }
        }
    }
}
