//! In-process search path registry.
//!
//! Tools installed during a run must be resolvable by later steps without a
//! shell restart. Instead of mutating the process environment, the engine
//! threads a [`PathRegistry`] through every step and renders it into the
//! `PATH` of each child process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Ordered, de-duplicated set of searchable directories.
///
/// # Example
///
/// ```
/// use rigup::paths::PathRegistry;
///
/// let mut paths = PathRegistry::from_path_var("/usr/bin:/bin");
/// assert!(paths.ensure_searchable("/home/dev/.local/bin"));
/// assert!(!paths.ensure_searchable("/usr/bin"));
/// assert_eq!(paths.entries()[0], std::path::PathBuf::from("/home/dev/.local/bin"));
/// assert_eq!(paths.run_additions().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    /// Entries in precedence order.
    entries: Vec<PathBuf>,
    /// Entries added after the seed, in insertion order.
    additions: Vec<PathBuf>,
}

impl PathRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a `PATH`-style value; later duplicates are dropped.
    pub fn from_path_var(value: impl Into<OsString>) -> Self {
        let value = value.into();
        let mut entries: Vec<PathBuf> = Vec::new();
        for dir in std::env::split_paths(&value) {
            if dir.as_os_str().is_empty() || entries.contains(&dir) {
                continue;
            }
            entries.push(dir);
        }
        Self {
            entries,
            additions: Vec::new(),
        }
    }

    /// Seed from the current process `PATH`.
    pub fn from_env() -> Self {
        Self::from_path_var(std::env::var_os("PATH").unwrap_or_default())
    }

    /// Seed from the process `PATH`, then add well-known user bin
    /// directories that already exist on disk.
    pub fn initialize(home: &Path, nvm_dir: &Path) -> Self {
        let mut registry = Self::from_env();
        for dir in well_known_dirs(home, nvm_dir) {
            if dir.is_dir() && registry.ensure_searchable(&dir) {
                tracing::debug!("added existing {} to search path", dir.display());
            }
        }
        registry
    }

    /// Idempotently make `dir` searchable with highest precedence.
    ///
    /// Returns whether the registry changed. The return value is for
    /// logging only.
    pub fn ensure_searchable(&mut self, dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        if self.contains(dir) {
            return false;
        }
        // New tool directories shadow older system copies.
        self.entries.insert(self.additions.len(), dir.to_path_buf());
        self.additions.push(dir.to_path_buf());
        true
    }

    /// Whether `dir` is already searchable.
    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.iter().any(|e| e == dir)
    }

    /// All entries in precedence order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Directories added during this run, in first-insertion order.
    pub fn run_additions(&self) -> &[PathBuf] {
        &self.additions
    }

    /// Render as a `PATH` value for child processes.
    pub fn to_env_value(&self) -> OsString {
        std::env::join_paths(&self.entries).unwrap_or_else(|_| {
            // An entry containing the separator cannot be joined; drop them.
            let usable: Vec<&PathBuf> = self
                .entries
                .iter()
                .filter(|e| std::env::join_paths([e]).is_ok())
                .collect();
            std::env::join_paths(usable).unwrap_or_default()
        })
    }
}

/// User-level bin directories installers commonly drop tools into.
pub fn well_known_dirs(home: &Path, nvm_dir: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".local/bin"),
        nvm_dir.join("current/bin"),
        home.join(".npm-global/bin"),
    ]
}
