//! Capability probe: is a tool present, and at what version?
//!
//! Probing never mutates the host and never fails. A missing tool is the
//! ordinary `Absent` outcome that drives a step's corrective action.
//!
//! # Example
//!
//! ```
//! use rigup::paths::PathRegistry;
//! use rigup::shell::ScriptedRunner;
//! use rigup::tools::{CapabilityProbe, Tool};
//!
//! let runner = ScriptedRunner::new().with_tool("git", "git version 2.43.0");
//! let paths = PathRegistry::new();
//! let probe = CapabilityProbe::new(&runner, &paths);
//!
//! assert_eq!(probe.probe(&Tool::executable("git")).version(), Some("git version 2.43.0"));
//! assert!(!probe.probe(&Tool::executable("pnpm")).is_present());
//! ```

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::paths::PathRegistry;
use crate::shell::CommandRunner;

use super::tool::{PresenceCheck, Tool};

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\D*?(\d+)").expect("valid leading integer regex"));

/// Outcome of probing one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Not installed (or not resolvable on the search path).
    Absent,
    /// Installed; the version is None when the query failed.
    Present {
        location: Option<PathBuf>,
        version: Option<String>,
    },
}

impl ProbeResult {
    /// Whether the tool is present.
    pub fn is_present(&self) -> bool {
        matches!(self, ProbeResult::Present { .. })
    }

    /// The reported version string, if known.
    pub fn version(&self) -> Option<&str> {
        match self {
            ProbeResult::Present { version, .. } => version.as_deref(),
            ProbeResult::Absent => None,
        }
    }

    /// Version for display: the string, "unknown", or "not installed".
    pub fn version_label(&self) -> &str {
        match self {
            ProbeResult::Present { version: Some(v), .. } => v,
            ProbeResult::Present { version: None, .. } => "unknown",
            ProbeResult::Absent => "not installed",
        }
    }
}

/// Read-only presence and version checks against a search path.
pub struct CapabilityProbe<'a> {
    runner: &'a dyn CommandRunner,
    paths: &'a PathRegistry,
}

impl<'a> CapabilityProbe<'a> {
    /// Probe through `runner`, resolving executables on `paths`.
    pub fn new(runner: &'a dyn CommandRunner, paths: &'a PathRegistry) -> Self {
        Self { runner, paths }
    }

    /// Probe a single tool.
    pub fn probe(&self, tool: &Tool) -> ProbeResult {
        let location = match &tool.presence {
            PresenceCheck::Executable(program) => {
                match self.runner.locate(program, self.paths.entries()) {
                    Some(path) => Some(path),
                    None => return ProbeResult::Absent,
                }
            }
            PresenceCheck::File(path) => {
                if !self.runner.file_exists(path) {
                    return ProbeResult::Absent;
                }
                Some(path.clone())
            }
        };

        ProbeResult::Present {
            location,
            version: self.query_version(tool),
        }
    }

    /// Whether a tool is present, without querying its version.
    pub fn is_present(&self, tool: &Tool) -> bool {
        match &tool.presence {
            PresenceCheck::Executable(program) => {
                self.runner.locate(program, self.paths.entries()).is_some()
            }
            PresenceCheck::File(path) => self.runner.file_exists(path),
        }
    }

    fn query_version(&self, tool: &Tool) -> Option<String> {
        let query = tool.version_query.as_ref()?;
        let invocation = query.clone().with_search_path(self.paths);
        match self.runner.run(&invocation) {
            Ok(result) if result.success => first_line(&result.stdout)
                .or_else(|| first_line(&result.stderr))
                .map(str::to_string),
            Ok(result) => {
                tracing::debug!(
                    "version query for {} exited with {:?}",
                    tool.name,
                    result.exit_code
                );
                None
            }
            Err(e) => {
                tracing::debug!("version query for {} failed: {}", tool.name, e);
                None
            }
        }
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Extract the leading integer component of a version string.
///
/// `"v20.11.1"` → 20, `"git version 2.43.0"` → 2. No semantic ordering is
/// implied; callers compare for exact equality only.
pub fn leading_major(version: &str) -> Option<u32> {
    LEADING_INTEGER
        .captures(version.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
