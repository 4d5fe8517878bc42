//! Cross-location registration diagnostics.

use std::path::Path;

use crate::error::Result;
use crate::registration::{entry_names, RegistryClient};

/// List registered entries as seen from `location_a` and from `location_b`.
///
/// Both listings are returned unmodified; see [`Drift::between`] for a
/// name-level comparison.
pub fn diff_registrations(
    client: &dyn RegistryClient,
    location_a: &Path,
    location_b: &Path,
) -> Result<(Vec<String>, Vec<String>)> {
    let list_a = client.list(location_a)?;
    let list_b = client.list(location_b)?;
    Ok((list_a, list_b))
}

/// Entry names visible from only one of two locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drift {
    /// Visible from the first location only.
    pub only_a: Vec<String>,
    /// Visible from the second location only.
    pub only_b: Vec<String>,
}

impl Drift {
    /// Compare two raw listings by entry name.
    pub fn between(list_a: &[String], list_b: &[String]) -> Self {
        let names_a = entry_names(list_a);
        let names_b = entry_names(list_b);
        Self {
            only_a: names_a
                .iter()
                .filter(|n| !names_b.contains(n))
                .cloned()
                .collect(),
            only_b: names_b
                .iter()
                .filter(|n| !names_a.contains(n))
                .cloned()
                .collect(),
        }
    }

    /// No differences.
    pub fn is_empty(&self) -> bool {
        self.only_a.is_empty() && self.only_b.is_empty()
    }

    /// Human summary, labelling each side.
    pub fn describe(&self, label_a: &str, label_b: &str) -> String {
        let mut parts = Vec::new();
        if !self.only_a.is_empty() {
            parts.push(format!("only in {}: {}", label_a, self.only_a.join(", ")));
        }
        if !self.only_b.is_empty() {
            parts.push(format!("only in {}: {}", label_b, self.only_b.join(", ")));
        }
        parts.join("; ")
    }
}
