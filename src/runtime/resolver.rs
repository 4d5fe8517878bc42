//! Preferred/fallback runtime version resolution.

use crate::error::{Result, RigupError};
use crate::shell::CommandRunner;
use crate::tools::leading_major;

use super::manager::RuntimeManager;

/// Preferred and fallback major versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPreference {
    /// Tried first.
    pub preferred_major: u32,
    /// Tried only when the preferred major cannot be activated.
    pub fallback_major: u32,
}

impl VersionPreference {
    /// Create a preference.
    pub fn new(preferred_major: u32, fallback_major: u32) -> Self {
        Self {
            preferred_major,
            fallback_major,
        }
    }

    /// Majors to attempt, in order, without repeats.
    pub fn candidates(&self) -> Vec<u32> {
        if self.preferred_major == self.fallback_major {
            vec![self.preferred_major]
        } else {
            vec![self.preferred_major, self.fallback_major]
        }
    }

    /// Whether `major` satisfies either choice.
    pub fn accepts(&self, major: u32) -> bool {
        major == self.preferred_major || major == self.fallback_major
    }
}

/// The version that ended up active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The major that was requested and activated.
    pub activated_major: u32,
    /// Version string reported by the manager (e.g. `v20.11.1`).
    pub version: String,
    /// Whether the fallback was used.
    pub fell_back: bool,
    /// Set when the reported version's major differs from the request.
    pub mismatch: Option<String>,
}

/// Installs and activates a runtime version, falling back deterministically.
pub struct VersionResolver<'a> {
    runner: &'a dyn CommandRunner,
    manager: &'a RuntimeManager,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver.
    pub fn new(runner: &'a dyn CommandRunner, manager: &'a RuntimeManager) -> Self {
        Self { runner, manager }
    }

    /// Activate the preferred major, else the fallback.
    ///
    /// The fallback is never attempted when the preferred major activates.
    /// Fails only when no candidate could be both installed and made the
    /// default.
    pub fn resolve(&self, preference: &VersionPreference) -> Result<Activation> {
        let mut failures = Vec::new();

        for major in preference.candidates() {
            match self.activate(major) {
                Ok(version) => {
                    let mismatch = match leading_major(&version) {
                        Some(actual) if actual == major => None,
                        _ => Some(format!(
                            "requested runtime {} but the manager reports {}",
                            major, version
                        )),
                    };
                    if let Some(note) = &mismatch {
                        tracing::debug!("{}", note);
                    }
                    return Ok(Activation {
                        activated_major: major,
                        version,
                        fell_back: major != preference.preferred_major,
                        mismatch,
                    });
                }
                Err(e) => {
                    tracing::debug!("runtime {} could not be activated: {}", major, e);
                    failures.push(format!("{}: {}", major, e));
                }
            }
        }

        Err(RigupError::step(
            "runtime",
            format!("no runtime version could be activated ({})", failures.join("; ")),
            Some(self.manager.install(preference.preferred_major).display()),
        ))
    }

    /// Install `major`, set it as default, and confirm both took effect.
    fn activate(&self, major: u32) -> Result<String> {
        self.runner.run_checked(&self.manager.install(major))?;

        let version = self
            .manager
            .query(self.runner, &self.manager.installed_version(major))?
            .ok_or_else(|| {
                RigupError::step(
                    "runtime",
                    format!("install of {} reported success but no version is present", major),
                    Some(self.manager.install(major).display()),
                )
            })?;

        self.runner.run_checked(&self.manager.set_default(major))?;
        match self.manager.current_default(self.runner) {
            Some(default) if default == version => Ok(version),
            other => Err(RigupError::step(
                "runtime",
                format!(
                    "default is {} after selecting {}",
                    other.as_deref().unwrap_or("unset"),
                    version
                ),
                Some(self.manager.set_default(major).display()),
            )),
        }
    }
}
