//! The fixed catalog of server entries.

use std::path::Path;

use super::launch::{LaunchCommand, Launcher};

/// Where a registered server is started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingDirectory {
    /// Always the user's home directory.
    Home,
    /// Whatever directory the registry client starts it in.
    Inherit,
}

/// One named server registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Unique key in the registry.
    pub name: String,
    /// Launch mechanism.
    pub launcher: Launcher,
    /// Pass-through arguments for the launched program.
    pub args: Vec<String>,
    /// Working directory override.
    pub working_directory: WorkingDirectory,
    /// Executable that must be present, or the entry is skipped.
    pub required_capability: Option<String>,
}

impl RegistryEntry {
    /// An entry pinned to home when its launcher resolves from the cwd.
    pub fn new(name: &str, launcher: Launcher) -> Self {
        let working_directory = if launcher.resolves_from_cwd() {
            WorkingDirectory::Home
        } else {
            WorkingDirectory::Inherit
        };
        Self {
            name: name.to_string(),
            launcher,
            args: Vec::new(),
            working_directory,
            required_capability: None,
        }
    }

    /// Append a pass-through argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Require an executable before registering.
    pub fn requires(mut self, capability: &str) -> Self {
        self.required_capability = Some(capability.to_string());
        self
    }

    /// Override the working directory policy.
    pub fn working_directory(mut self, wd: WorkingDirectory) -> Self {
        self.working_directory = wd;
        self
    }

    /// The command registered for this entry.
    ///
    /// Depends only on the entry and `home`, never on the caller's
    /// working directory.
    pub fn launch_command(&self, home: &Path) -> LaunchCommand {
        let argv = self.launcher.argv(&self.args);
        match self.working_directory {
            WorkingDirectory::Home => LaunchCommand::pinned(home, &argv),
            WorkingDirectory::Inherit => LaunchCommand::direct(argv),
        }
    }
}

/// The default set of servers.
pub fn default_catalog(home: &Path) -> Vec<RegistryEntry> {
    vec![
        RegistryEntry::new(
            "filesystem",
            Launcher::Npx {
                package: "@modelcontextprotocol/server-filesystem".into(),
            },
        )
        .arg(home.to_string_lossy()),
        RegistryEntry::new(
            "memory",
            Launcher::Npx {
                package: "@modelcontextprotocol/server-memory".into(),
            },
        ),
        RegistryEntry::new(
            "sequential-thinking",
            Launcher::Npx {
                package: "@modelcontextprotocol/server-sequential-thinking".into(),
            },
        ),
        RegistryEntry::new(
            "playwright",
            Launcher::NpmExec {
                package: "@playwright/mcp@latest".into(),
                bin: "mcp-server-playwright".into(),
            },
        ),
        RegistryEntry::new(
            "fetch",
            Launcher::Uvx {
                package: "mcp-server-fetch".into(),
            },
        )
        .requires("uvx"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> &'static Path {
        Path::new("/home/user")
    }

    fn entry(name: &str) -> RegistryEntry {
        default_catalog(home())
            .into_iter()
            .find(|e| e.name == name)
            .unwrap()
    }

    // One golden launch line per catalog entry.

    #[test]
    fn golden_filesystem() {
        assert_eq!(
            entry("filesystem").launch_command(home()).display(),
            "sh -c 'cd '\\''/home/user'\\'' && exec npx -y @modelcontextprotocol/server-filesystem /home/user'"
        );
    }

    #[test]
    fn golden_memory() {
        let cmd = entry("memory").launch_command(home());
        assert_eq!(cmd.program, "sh");
        assert_eq!(
            cmd.args[1],
            "cd '/home/user' && exec npx -y @modelcontextprotocol/server-memory"
        );
    }

    #[test]
    fn golden_sequential_thinking() {
        let cmd = entry("sequential-thinking").launch_command(home());
        assert_eq!(
            cmd.args[1],
            "cd '/home/user' && exec npx -y @modelcontextprotocol/server-sequential-thinking"
        );
    }

    #[test]
    fn golden_playwright() {
        let cmd = entry("playwright").launch_command(home());
        assert_eq!(
            cmd.args[1],
            "cd '/home/user' && exec npm exec --yes --package=@playwright/mcp@latest -- mcp-server-playwright"
        );
    }

    #[test]
    fn golden_fetch() {
        let e = entry("fetch");
        assert_eq!(e.working_directory, WorkingDirectory::Inherit);
        assert_eq!(e.required_capability.as_deref(), Some("uvx"));
        assert_eq!(e.launch_command(home()).display(), "uvx mcp-server-fetch");
    }

    #[test]
    fn npx_entries_never_carry_separator() {
        for e in default_catalog(home()) {
            if let Launcher::Npx { .. } = e.launcher {
                assert!(!e.launcher.argv(&e.args).contains(&"--".to_string()), "{}", e.name);
            }
        }
    }

    #[test]
    fn names_are_unique() {
        let catalog = default_catalog(home());
        let mut names: Vec<_> = catalog.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn inherit_override_skips_pinning() {
        let e = RegistryEntry::new("local", Launcher::Npx { package: "p".into() })
            .working_directory(WorkingDirectory::Inherit);
        assert_eq!(e.launch_command(home()).display(), "npx -y p");
    }
}
