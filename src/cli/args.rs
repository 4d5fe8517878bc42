//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Scope;

/// rigup - Idempotent developer workstation provisioning.
#[derive(Debug, Parser)]
#[command(name = "rigup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides ~/.config/rigup/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project directory (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; use defaults
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full provisioning pipeline (default if no command specified)
    Run(RunArgs),

    /// Show installed tools and versions
    Status(StatusArgs),

    /// Register the server catalog with the application
    Register(RegisterArgs),

    /// Compare registrations visible from two directories
    Diff(DiffArgs),

    /// Copy user-scope entries missing from the project config into it
    Repair(RepairArgs),

    /// Move project-local registry documents aside
    Purge(PurgeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Upgrade pnpm, uv and the application even when already installed
    #[arg(long)]
    pub upgrade: bool,

    /// Registration scope (user or project)
    #[arg(long)]
    pub scope: Option<Scope>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {}

/// Arguments for the `register` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RegisterArgs {
    /// Registration scope (user or project)
    #[arg(long)]
    pub scope: Option<Scope>,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiffArgs {
    /// First directory (defaults to home)
    pub location_a: Option<PathBuf>,

    /// Second directory (defaults to the project directory)
    pub location_b: Option<PathBuf>,
}

/// Arguments for the `repair` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RepairArgs {}

/// Arguments for the `purge` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PurgeArgs {
    /// Move documents without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["rigup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from(["rigup", "run", "--yes", "--upgrade"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.yes);
                assert!(args.upgrade);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn run_scope_parses() {
        let cli = Cli::try_parse_from(["rigup", "run", "--scope", "project"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.scope, Some(Scope::Project)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn register_scope_parses() {
        let cli = Cli::try_parse_from(["rigup", "register", "--scope", "project"]).unwrap();
        match cli.command {
            Some(Commands::Register(args)) => assert_eq!(args.scope, Some(Scope::Project)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn register_rejects_unknown_scope() {
        assert!(Cli::try_parse_from(["rigup", "register", "--scope", "global"]).is_err());
    }

    #[test]
    fn diff_locations_are_optional() {
        let cli = Cli::try_parse_from(["rigup", "diff", "/tmp/a"]).unwrap();
        match cli.command {
            Some(Commands::Diff(args)) => {
                assert_eq!(args.location_a, Some(PathBuf::from("/tmp/a")));
                assert!(args.location_b.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["rigup", "status", "--non-interactive", "--debug"]).unwrap();
        assert!(cli.non_interactive);
        assert!(cli.debug);
    }
}
