//! Removal of stale shell configuration lines.
//!
//! An old `alias <app>=...` in a startup file shadows the real executable
//! and survives reinstalls. Scrubbing backs each affected file up once and
//! rewrites it without the matching lines; every other byte is preserved.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::copy_to_backup;
use crate::error::Result;

/// Decides which lines are stale.
pub trait LineMatcher {
    /// Whether `line` (without its line ending) should be removed.
    fn matches(&self, line: &str) -> bool;
}

/// Matches alias definitions that shadow a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleAlias {
    prefix: String,
}

impl StaleAlias {
    /// Match `alias <command>=...`, ignoring leading whitespace.
    pub fn new(command: &str) -> Self {
        Self {
            prefix: format!("alias {}=", command),
        }
    }
}

impl LineMatcher for StaleAlias {
    fn matches(&self, line: &str) -> bool {
        line.trim_start().starts_with(&self.prefix)
    }
}

/// Outcome of scrubbing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubbedFile {
    /// The rewritten file.
    pub path: PathBuf,
    /// Where the original content was saved.
    pub backup: PathBuf,
    /// Number of lines removed.
    pub removed: usize,
}

/// Remove matching lines from every existing file in `files`.
///
/// Missing files and files without matches are left untouched and produce
/// no backup.
pub fn scrub(files: &[PathBuf], matcher: &dyn LineMatcher) -> Result<Vec<ScrubbedFile>> {
    let mut modified = Vec::new();
    for path in files {
        if let Some(done) = scrub_file(path, matcher)? {
            modified.push(done);
        }
    }
    Ok(modified)
}

/// Files among `files` that still contain a matching line.
pub fn find_stale(files: &[PathBuf], matcher: &dyn LineMatcher) -> Result<Vec<PathBuf>> {
    let mut stale = Vec::new();
    for path in files {
        if let Some(content) = read_existing(path)? {
            if content.lines().any(|l| matcher.matches(l)) {
                stale.push(path.clone());
            }
        }
    }
    Ok(stale)
}

fn scrub_file(path: &Path, matcher: &dyn LineMatcher) -> Result<Option<ScrubbedFile>> {
    let Some(content) = read_existing(path)? else {
        return Ok(None);
    };

    let mut kept = String::with_capacity(content.len());
    let mut removed = 0;
    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');
        if matcher.matches(bare) {
            removed += 1;
        } else {
            kept.push_str(line);
        }
    }

    if removed == 0 {
        return Ok(None);
    }

    let backup = copy_to_backup(path)?;
    fs::write(path, kept)?;
    tracing::debug!("removed {} stale line(s) from {}", removed, path.display());
    Ok(Some(ScrubbedFile {
        path: path.to_path_buf(),
        backup,
        removed,
    }))
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::existing_backups;
    use tempfile::TempDir;

    #[test]
    fn matcher_ignores_leading_whitespace() {
        let m = StaleAlias::new("claude");
        assert!(m.matches("alias claude=\"~/.claude/local/claude\""));
        assert!(m.matches("    alias claude='npx claude'"));
        assert!(!m.matches("# alias claude=old"));
        assert!(!m.matches("alias claudette=foo"));
        assert!(!m.matches("export PATH=\"$HOME/bin:$PATH\""));
    }

    #[test]
    fn clean_file_is_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".bashrc");
        let original = "export A=1\r\nalias ll='ls -l'\nno newline at end";
        fs::write(&path, original).unwrap();

        let modified = scrub(&[path.clone()], &StaleAlias::new("claude")).unwrap();

        assert!(modified.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(existing_backups(&path).unwrap().is_empty());
    }

    #[test]
    fn removes_all_matches_with_one_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".zshrc");
        let original = "export A=1\nalias claude=\"old\"\nalias ll='ls -l'\n  alias claude=older\nlast";
        fs::write(&path, original).unwrap();

        let modified = scrub(&[path.clone()], &StaleAlias::new("claude")).unwrap();

        assert_eq!(modified.len(), 1);
        assert_eq!(modified[0].removed, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "export A=1\nalias ll='ls -l'\nlast"
        );
        assert_eq!(fs::read_to_string(&modified[0].backup).unwrap(), original);
        assert_eq!(existing_backups(&path).unwrap().len(), 1);
    }

    #[test]
    fn second_scrub_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".bashrc");
        fs::write(&path, "alias claude=x\nexport B=2\n").unwrap();
        let matcher = StaleAlias::new("claude");

        scrub(&[path.clone()], &matcher).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();
        let again = scrub(&[path.clone()], &matcher).unwrap();

        assert!(again.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
        assert_eq!(existing_backups(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let files = vec![temp.path().join(".profile"), temp.path().join(".zprofile")];
        assert!(scrub(&files, &StaleAlias::new("claude")).unwrap().is_empty());
        assert!(find_stale(&files, &StaleAlias::new("claude"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn crlf_lines_keep_their_endings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".profile");
        fs::write(&path, "a\r\nalias claude=x\r\nb\r\n").unwrap();
        scrub(&[path.clone()], &StaleAlias::new("claude")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\r\nb\r\n");
    }

    #[test]
    fn find_stale_reports_only_dirty_files() {
        let temp = TempDir::new().unwrap();
        let dirty = temp.path().join(".bashrc");
        let clean = temp.path().join(".zshrc");
        fs::write(&dirty, "alias claude=x\n").unwrap();
        fs::write(&clean, "export A=1\n").unwrap();
        let stale = find_stale(&[dirty.clone(), clean], &StaleAlias::new("claude")).unwrap();
        assert_eq!(stale, vec![dirty]);
    }
}
