//! Plugin server registration.
//!
//! - [`launch`] - Launch mechanisms and their argument grammars
//! - [`catalog`] - The fixed set of entries
//! - [`client`] - The application's `mcp` subcommands
//! - [`manager`] - Batch registration with per-entry outcomes
//!
//! Registered launch commands depend only on the catalog and the home
//! directory, so registering from any working directory gives identical
//! results:
//!
//! ```
//! use rigup::registration::default_catalog;
//! use std::path::Path;
//!
//! let home = Path::new("/home/user");
//! let memory = &default_catalog(home)[1];
//! assert_eq!(
//!     memory.launch_command(home).args[1],
//!     "cd '/home/user' && exec npx -y @modelcontextprotocol/server-memory"
//! );
//! ```

pub mod catalog;
pub mod client;
pub mod launch;
pub mod manager;

pub use catalog::{default_catalog, RegistryEntry, WorkingDirectory};
pub use client::{entry_names, CliRegistryClient, RegistryClient};
pub use launch::{LaunchCommand, Launcher};
pub use manager::{EntryOutcome, RegistrationManager, RegistrationOutcome, RegistrationReport};
