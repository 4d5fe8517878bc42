//! Persisting activation lines into shell startup files.
//!
//! Persistence is append-only and check-before-append: a line already
//! present (modulo whitespace, quoting and home-directory spelling) is never
//! written twice, so any number of runs leaves each line exactly once.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A startup file and the literal lines that must be present in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceTarget {
    /// Startup file path.
    pub path: PathBuf,
    /// Lines that must appear exactly once.
    pub lines: Vec<String>,
}

impl PersistenceTarget {
    /// Create a target with no lines.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: Vec::new(),
        }
    }

    /// Require `line` in this target.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Lines not yet present in the file (an absent file has none).
    pub fn missing(&self, home: &Path) -> Result<Vec<String>> {
        let existing = read_or_empty(&self.path)?;
        Ok(self.missing_from(&existing, home))
    }

    fn missing_from(&self, existing: &str, home: &Path) -> Vec<String> {
        let mut present: Vec<String> = existing
            .lines()
            .map(|l| normalize_line(l, home))
            .collect();
        let mut missing = Vec::new();
        for line in &self.lines {
            let normalized = normalize_line(line, home);
            if !present.contains(&normalized) {
                present.push(normalized);
                missing.push(line.clone());
            }
        }
        missing
    }

    /// Append every missing line; returns how many were written.
    ///
    /// Creates the file (and its parent directory) if absent. Existing
    /// content is never truncated or reordered.
    pub fn apply(&self, home: &Path) -> Result<usize> {
        let existing = read_or_empty(&self.path)?;
        let missing = self.missing_from(&existing, home);

        if missing.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        for line in &missing {
            writeln!(file, "{}", line)?;
        }
        tracing::debug!(
            "appended {} line(s) to {}",
            missing.len(),
            self.path.display()
        );
        Ok(missing.len())
    }
}

fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Persist `dir` onto `PATH` in each startup file.
///
/// Returns the number of files that changed.
pub fn persist(dir: &Path, files: &[PathBuf], home: &Path) -> Result<usize> {
    let line = path_line(dir, home);
    let mut changed = 0;
    for file in files {
        if PersistenceTarget::new(file).line(line.clone()).apply(home)? > 0 {
            changed += 1;
        }
    }
    Ok(changed)
}

/// The activation line that prepends `dir` to `PATH`.
///
/// Directories under home are spelled with `$HOME` so the line survives a
/// home directory move.
pub fn path_line(dir: &Path, home: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", home_relative(dir, home))
}

/// Spell `path` relative to `$HOME` when it lives under `home`.
pub fn home_relative(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "$HOME".to_string(),
        Ok(rest) => format!("$HOME/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Normalize a startup-file line for equivalence checks.
///
/// Collapses whitespace, drops quotes, and folds `~`, `${HOME}` and the
/// absolute home path into `$HOME`.
pub fn normalize_line(line: &str, home: &Path) -> String {
    let home_str = home.display().to_string();
    let mut normalized = line
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['"', '\''], "")
        .replace("${HOME}", "$HOME");
    if !home_str.is_empty() && home_str != "/" {
        normalized = normalized.replace(&home_str, "$HOME");
    }
    normalized
        .replace("=~/", "=$HOME/")
        .replace(":~/", ":$HOME/")
        .replace(" ~/", " $HOME/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_line_uses_home_variable() {
        let home = Path::new("/home/dev");
        assert_eq!(
            path_line(&home.join(".local/bin"), home),
            r#"export PATH="$HOME/.local/bin:$PATH""#
        );
        assert_eq!(
            path_line(Path::new("/opt/tools/bin"), home),
            r#"export PATH="/opt/tools/bin:$PATH""#
        );
    }

    #[test]
    fn normalize_treats_spellings_as_equivalent() {
        let home = Path::new("/home/dev");
        let expected = normalize_line(r#"export PATH="$HOME/.local/bin:$PATH""#, home);
        for variant in [
            "export PATH=$HOME/.local/bin:$PATH",
            "  export   PATH=\"${HOME}/.local/bin:$PATH\"  ",
            "export PATH=~/.local/bin:$PATH",
            "export PATH=/home/dev/.local/bin:$PATH",
        ] {
            assert_eq!(normalize_line(variant, home), expected, "{}", variant);
        }
    }

    #[test]
    fn apply_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("nested/.bashrc");
        let written = PersistenceTarget::new(&rc)
            .line("export A=1")
            .apply(temp.path())
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&rc).unwrap(), "export A=1\n");
    }

    #[test]
    fn apply_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".zshrc");
        let target = PersistenceTarget::new(&rc)
            .line("export A=1")
            .line("export B=2");
        assert_eq!(target.apply(temp.path()).unwrap(), 2);
        assert_eq!(target.apply(temp.path()).unwrap(), 0);
        assert_eq!(target.apply(temp.path()).unwrap(), 0);
        let content = fs::read_to_string(&rc).unwrap();
        assert_eq!(content.matches("export A=1").count(), 1);
        assert_eq!(content.matches("export B=2").count(), 1);
    }

    #[test]
    fn apply_preserves_existing_content_without_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".bashrc");
        fs::write(&rc, "alias ll='ls -l'").unwrap();
        PersistenceTarget::new(&rc)
            .line("export A=1")
            .apply(temp.path())
            .unwrap();
        assert_eq!(
            fs::read_to_string(&rc).unwrap(),
            "alias ll='ls -l'\nexport A=1\n"
        );
    }

    #[test]
    fn apply_skips_lines_already_present_in_other_spelling() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        let rc = home.join(".bashrc");
        fs::write(
            &rc,
            format!("export PATH={}/.local/bin:$PATH\n", home.display()),
        )
        .unwrap();
        let changed = persist(&home.join(".local/bin"), &[rc.clone()], home).unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn missing_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".bashrc");
        let target = PersistenceTarget::new(&rc).line("export A=1");
        assert_eq!(target.missing(temp.path()).unwrap(), vec!["export A=1"]);
        assert!(!rc.exists());
        target.apply(temp.path()).unwrap();
        assert!(target.missing(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_lines_in_one_target_written_once() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".profile");
        let written = PersistenceTarget::new(&rc)
            .line("export A=1")
            .line("export  A=1")
            .apply(temp.path())
            .unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn persist_counts_changed_files() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        let files = vec![home.join(".bashrc"), home.join(".zshrc")];
        assert_eq!(persist(&home.join("bin"), &files, home).unwrap(), 2);
        assert_eq!(persist(&home.join("bin"), &files, home).unwrap(), 0);
    }
}
