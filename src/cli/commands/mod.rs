//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads a
//! [`Session`] (settings, host layout, search path, runner) and routes CLI
//! subcommands to their implementations. No subcommand means `run`.

pub mod completions;
pub mod diff;
pub mod dispatcher;
pub mod purge;
pub mod register;
pub mod repair;
pub mod run;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, Session};
