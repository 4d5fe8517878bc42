//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`Session`] for the settings, host layout and runner a command works on
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_settings, HostLayout, Settings};
use crate::error::Result;
use crate::paths::PathRegistry;
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Everything a command needs from the host.
pub struct Session {
    /// Effective settings.
    pub settings: Settings,
    /// Host locations.
    pub layout: HostLayout,
    /// Initial search path.
    pub paths: PathRegistry,
    /// Command capability interface.
    pub runner: Box<dyn CommandRunner>,
}

impl Session {
    /// Load settings and discover the host.
    pub fn load(config_path: Option<&Path>, project_dir: Option<&Path>) -> Result<Self> {
        let settings = load_settings(config_path)?;
        let layout = HostLayout::discover(project_dir)?;
        let paths = PathRegistry::initialize(&layout.home, &layout.nvm_dir);
        tracing::debug!(
            "home {}, project {}, nvm {}",
            layout.home.display(),
            layout.project_dir.display(),
            layout.nvm_dir.display()
        );
        Ok(Self {
            settings,
            layout,
            paths,
            runner: Box::new(SystemRunner::new()),
        })
    }

    /// Build a session from parts.
    pub fn new(
        settings: Settings,
        layout: HostLayout,
        paths: PathRegistry,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            layout,
            paths,
            runner,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
    project_dir: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(config_path: Option<PathBuf>, project_dir: Option<PathBuf>) -> Self {
        Self {
            config_path,
            project_dir,
        }
    }

    fn session(&self) -> Result<Session> {
        Session::load(self.config_path.as_deref(), self.project_dir.as_deref())
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `run`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(self.session()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Status(_)) => {
                let cmd = super::status::StatusCommand::new(self.session()?);
                cmd.execute(ui)
            }
            Some(Commands::Register(args)) => {
                let cmd = super::register::RegisterCommand::new(self.session()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Diff(args)) => {
                let cmd = super::diff::DiffCommand::new(self.session()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Repair(_)) => {
                let cmd = super::repair::RepairCommand::new(self.session()?);
                cmd.execute(ui)
            }
            Some(Commands::Purge(args)) => {
                let cmd = super::purge::PurgeCommand::new(self.session()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::run::RunCommand::new(self.session()?, RunArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
