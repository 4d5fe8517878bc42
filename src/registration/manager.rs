//! Batch registration with per-entry outcomes.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Scope;
use crate::tools::{CapabilityProbe, Tool};

use super::catalog::RegistryEntry;
use super::client::RegistryClient;

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Registered (or re-registered) successfully.
    Registered,
    /// Not attempted.
    Skipped(String),
    /// Attempted and rejected by the registry client.
    Failed(String),
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationOutcome::Registered => write!(f, "registered"),
            RegistrationOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            RegistrationOutcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Outcome for a single catalog entry.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// Entry name.
    pub name: String,
    /// Launch command as registered (or as it would have been).
    pub launch: String,
    /// Result.
    pub outcome: RegistrationOutcome,
}

/// Result of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct RegistrationReport {
    /// Per-entry outcomes in catalog order.
    pub entries: Vec<EntryOutcome>,
}

impl RegistrationReport {
    fn names_where(&self, pred: impl Fn(&RegistrationOutcome) -> bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| pred(&e.outcome))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Names of registered entries.
    pub fn registered(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, RegistrationOutcome::Registered))
    }

    /// Names of skipped entries.
    pub fn skipped(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, RegistrationOutcome::Skipped(_)))
    }

    /// Names of failed entries.
    pub fn failed(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, RegistrationOutcome::Failed(_)))
    }

    /// Outcome for `name`.
    pub fn outcome(&self, name: &str) -> Option<&RegistrationOutcome> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.outcome)
    }

    /// Every entry was registered.
    pub fn is_clean(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == RegistrationOutcome::Registered)
    }

    /// `name: outcome` lines for display.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.name, e.outcome))
            .collect()
    }
}

/// Registers catalog entries through a [`RegistryClient`].
pub struct RegistrationManager<'a> {
    client: &'a dyn RegistryClient,
    probe: CapabilityProbe<'a>,
    home: PathBuf,
}

impl<'a> RegistrationManager<'a> {
    /// Create a manager. `home` is the forced working directory.
    pub fn new(client: &'a dyn RegistryClient, probe: CapabilityProbe<'a>, home: &Path) -> Self {
        Self {
            client,
            probe,
            home: home.to_path_buf(),
        }
    }

    /// Register every entry; one entry's failure never stops the batch.
    pub fn register_all(&self, entries: &[RegistryEntry], scope: Scope) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        for entry in entries {
            let launch = entry.launch_command(&self.home);
            let outcome = self.register_one(entry, scope);
            match &outcome {
                RegistrationOutcome::Registered => {
                    tracing::debug!("registered {} ({} scope)", entry.name, scope)
                }
                RegistrationOutcome::Skipped(reason) => {
                    tracing::debug!("skipped {}: {}", entry.name, reason)
                }
                RegistrationOutcome::Failed(reason) => {
                    tracing::debug!("failed to register {}: {}", entry.name, reason)
                }
            }
            report.entries.push(EntryOutcome {
                name: entry.name.clone(),
                launch: launch.display(),
                outcome,
            });
        }
        report
    }

    fn register_one(&self, entry: &RegistryEntry, scope: Scope) -> RegistrationOutcome {
        if let Some(capability) = &entry.required_capability {
            if !self.probe.is_present(&Tool::executable(capability)) {
                return RegistrationOutcome::Skipped(format!("missing capability: {}", capability));
            }
        }
        let launch = entry.launch_command(&self.home);
        match self.client.register(&entry.name, &launch, scope) {
            Ok(()) => RegistrationOutcome::Registered,
            Err(e) => RegistrationOutcome::Failed(e.to_string()),
        }
    }
}
