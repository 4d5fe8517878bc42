//! The application's own registry client.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{HostLayout, Scope, Settings};
use crate::document::{read_document, servers};
use crate::error::Result;
use crate::paths::PathRegistry;
use crate::shell::{CommandRunner, Invocation};

use super::launch::LaunchCommand;

/// Operations the registration manager and status reporter need from the
/// registry client.
pub trait RegistryClient {
    /// Register (or replace) `name` so it launches `launch`.
    fn register(&self, name: &str, launch: &LaunchCommand, scope: Scope) -> Result<()>;

    /// Raw listing of registered entries, as seen from `location`.
    fn list(&self, location: &Path) -> Result<Vec<String>>;
}

/// Drives `<app> mcp ...` through a [`CommandRunner`].
pub struct CliRegistryClient<'a> {
    runner: &'a dyn CommandRunner,
    search_path: String,
    program: String,
    home: PathBuf,
    project_dir: PathBuf,
    nvm_dir: PathBuf,
    user_document: PathBuf,
    project_document: PathBuf,
}

impl<'a> CliRegistryClient<'a> {
    /// Create a client for the configured application.
    pub fn new(
        runner: &'a dyn CommandRunner,
        paths: &PathRegistry,
        settings: &Settings,
        layout: &HostLayout,
    ) -> Self {
        Self {
            runner,
            search_path: paths.to_env_value().to_string_lossy().into_owned(),
            program: settings.app.command.clone(),
            home: layout.home.clone(),
            project_dir: layout.project_dir.clone(),
            nvm_dir: layout.nvm_dir.clone(),
            user_document: layout.user_document(settings),
            project_document: layout.project_document(settings),
        }
    }

    fn invocation<I, S>(&self, args: I, cwd: &Path) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(self.program.clone(), args)
            .in_dir(cwd)
            .with_env("PATH", self.search_path.clone())
            .with_env("NVM_DIR", self.nvm_dir.to_string_lossy())
    }

    fn scope_dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::User => &self.home,
            Scope::Project => &self.project_dir,
        }
    }

    fn scope_document(&self, scope: Scope) -> &Path {
        match scope {
            Scope::User => &self.user_document,
            Scope::Project => &self.project_document,
        }
    }

    /// The entry currently registered as `name` in `scope`, read from that
    /// scope's registry document.
    pub fn existing(&self, name: &str, scope: Scope) -> Option<Value> {
        let path = self.scope_document(scope);
        match read_document(path) {
            Ok(Some(document)) => servers(&document).and_then(|s| s.get(name)).cloned(),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("could not read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// `<app> mcp remove --scope <scope> <name>`
    pub fn remove_command(&self, name: &str, scope: Scope) -> Invocation {
        self.invocation(
            ["mcp", "remove", "--scope", scope.as_str(), name],
            self.scope_dir(scope),
        )
    }

    /// `<app> mcp add --scope <scope> <name> -- <program> <args...>`
    pub fn add_command(&self, name: &str, launch: &LaunchCommand, scope: Scope) -> Invocation {
        let mut args: Vec<String> = vec![
            "mcp".into(),
            "add".into(),
            "--scope".into(),
            scope.as_str().into(),
            name.into(),
            "--".into(),
        ];
        args.extend(launch.argv());
        self.invocation(args, self.scope_dir(scope))
    }

    /// `<app> mcp add-json --scope <scope> <name> <json>`, restoring an entry
    /// exactly as it was recorded.
    pub fn add_json_command(&self, name: &str, entry: &Value, scope: Scope) -> Invocation {
        self.invocation(
            [
                "mcp".to_string(),
                "add-json".to_string(),
                "--scope".to_string(),
                scope.as_str().to_string(),
                name.to_string(),
                entry.to_string(),
            ],
            self.scope_dir(scope),
        )
    }

    fn restore(&self, name: &str, entry: &Value, scope: Scope) {
        match self.runner.run_checked(&self.add_json_command(name, entry, scope)) {
            Ok(_) => tracing::debug!("restored previous registration of {}", name),
            Err(e) => tracing::debug!("could not restore {}: {}", name, e),
        }
    }
}

/// Whether a recorded entry already launches `launch`.
fn launches(entry: &Value, launch: &LaunchCommand) -> bool {
    let command = entry.get("command").and_then(Value::as_str);
    let args: Vec<&str> = entry
        .get("args")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    command == Some(launch.program.as_str()) && args == launch.args
}

impl RegistryClient for CliRegistryClient<'_> {
    fn register(&self, name: &str, launch: &LaunchCommand, scope: Scope) -> Result<()> {
        let previous = self.existing(name, scope);
        if previous.as_ref().is_some_and(|entry| launches(entry, launch)) {
            tracing::debug!("{} is already registered with this launch command", name);
            return Ok(());
        }

        // Replace rather than duplicate; a missing entry makes remove fail.
        let remove = self.remove_command(name, scope);
        match self.runner.run(&remove) {
            Ok(result) if !result.success => {
                tracing::debug!("{} had nothing to remove", name);
            }
            Ok(_) => tracing::debug!("removed previous registration of {}", name),
            Err(e) => tracing::debug!("remove {} failed: {}", name, e),
        }

        if let Err(e) = self.runner.run_checked(&self.add_command(name, launch, scope)) {
            if let Some(entry) = &previous {
                self.restore(name, entry, scope);
            }
            return Err(e);
        }
        Ok(())
    }

    fn list(&self, location: &Path) -> Result<Vec<String>> {
        let inv = self.invocation(["mcp", "list"], location);
        let result = self.runner.run_checked(&inv)?;
        Ok(result
            .stdout
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Entry names from `mcp list` output (`name: command ...` lines).
pub fn entry_names(listing: &[String]) -> Vec<String> {
    listing
        .iter()
        .filter_map(|line| line.split_once(": "))
        .map(|(name, _)| name.trim())
        .filter(|name| !name.is_empty() && !name.contains(' '))
        .map(str::to_string)
        .collect()
}
