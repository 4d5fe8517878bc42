//! rigup - Idempotent developer workstation provisioning.
//!
//! rigup installs a JavaScript runtime (through nvm), pnpm, uv/uvx and a
//! command-line application, persists the search path changes it made, and
//! registers a catalog of plugin servers with that application. Every step
//! probes host state first, so re-running on a converged machine does
//! nothing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings layering and host locations
//! - [`error`] - Error types and result aliases
//! - [`paths`] - Session search path and startup file persistence
//! - [`provision`] - The ordered provisioning pipeline
//! - [`registration`] - Server catalog and registry client
//! - [`runtime`] - nvm and preferred/fallback version resolution
//! - [`shell`] - Command capability interface
//! - [`status`] - Toolchain summary, diagnostics, repair and purge
//! - [`steps`] - Check, apply, verify execution
//! - [`tools`] - Tool definitions and capability probing
//! - [`ui`] - Status stream, prompts and spinners
//!
//! # Example
//!
//! ```
//! use rigup::config::{HostLayout, Settings};
//! use rigup::provision::{build_pipeline, PipelineOptions};
//! use rigup::shell::ShellType;
//!
//! let layout = HostLayout::new("/home/dev", "/home/dev/work");
//! let options = PipelineOptions { upgrade: false, shell: ShellType::Zsh };
//! let steps = build_pipeline(&Settings::default(), &layout, options);
//! assert_eq!(steps[0].name(), "prerequisites");
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod paths;
pub mod provision;
pub mod registration;
pub mod runtime;
pub mod scrub;
pub mod shell;
pub mod status;
pub mod steps;
pub mod tools;
pub mod ui;

pub use error::{Result, RigupError};
