//! Status reporting and registry document maintenance.
//!
//! - [`report`] - Toolchain presence and versions
//! - [`diagnostics`] - Registrations as seen from two locations
//! - [`merge`] - Non-destructive project document repair
//! - [`purge`] - Moving project documents aside

pub mod diagnostics;
pub mod merge;
pub mod purge;
pub mod report;

pub use diagnostics::{diff_registrations, Drift};
pub use merge::{merge_servers, missing_entries, repair_merge, MergeOutcome};
pub use purge::{purge, MovedDocument, PurgeOutcome, PURGE_PROMPT};
pub use report::{StatusReport, ToolStatus};
