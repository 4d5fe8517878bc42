//! Toolchain summary.

use std::fmt;

use crate::tools::{CapabilityProbe, ProbeResult, Tool};

/// One row of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    /// Tool name.
    pub name: String,
    /// Probe outcome.
    pub result: ProbeResult,
}

impl ToolStatus {
    /// `✓ node v20.11.1` or `✗ pnpm not installed`.
    pub fn line(&self) -> String {
        let mark = if self.result.is_present() { '✓' } else { '✗' };
        format!("{} {} {}", mark, self.name, self.result.version_label())
    }
}

/// Presence and version of every known tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Rows in display order.
    pub tools: Vec<ToolStatus>,
}

impl StatusReport {
    /// Probe each tool in order.
    pub fn collect(probe: &CapabilityProbe<'_>, tools: &[Tool]) -> Self {
        Self {
            tools: tools
                .iter()
                .map(|tool| ToolStatus {
                    name: tool.name.clone(),
                    result: probe.probe(tool),
                })
                .collect(),
        }
    }

    /// Names of tools that are not installed.
    pub fn missing(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|t| !t.result.is_present())
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Rendered rows.
    pub fn lines(&self) -> Vec<String> {
        self.tools.iter().map(ToolStatus::line).collect()
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
