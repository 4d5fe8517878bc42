//! Timestamped backups of files the engine rewrites or moves aside.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;

/// Marker inserted between the original name and the timestamp.
pub const BACKUP_MARKER: &str = "rigup-backup";

/// Pick a backup path for `path` that does not exist yet.
///
/// `<file>.rigup-backup-<YYYYmmddHHMMSS>`, with `-1`, `-2`, ... appended when
/// a backup from the same second already exists.
pub fn backup_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stamp = now.format("%Y%m%d%H%M%S");
    let base = format!("{}.{}-{}", path.display(), BACKUP_MARKER, stamp);
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}-{}", base, n));
        n += 1;
    }
    candidate
}

/// Copy `path` to a fresh backup, leaving the original in place.
pub fn copy_to_backup(path: &Path) -> Result<PathBuf> {
    let target = backup_path(path, Local::now());
    fs::copy(path, &target)?;
    tracing::debug!("backed up {} to {}", path.display(), target.display());
    Ok(target)
}

/// Move `path` to a fresh backup. The original path no longer exists afterwards.
pub fn move_to_backup(path: &Path) -> Result<PathBuf> {
    let target = backup_path(path, Local::now());
    fs::rename(path, &target)?;
    tracing::debug!("moved {} to {}", path.display(), target.display());
    Ok(target)
}

/// Backups of `path` currently on disk, sorted by name.
pub fn existing_backups(path: &Path) -> Result<Vec<PathBuf>> {
    let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
        return Ok(Vec::new());
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let prefix = format!("{}.{}-", name.to_string_lossy(), BACKUP_MARKER);
    let mut found: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn backup_path_uses_timestamp() {
        let path = Path::new("/home/dev/.bashrc");
        assert_eq!(
            backup_path(path, fixed_time()),
            PathBuf::from("/home/dev/.bashrc.rigup-backup-20260309140507")
        );
    }

    #[test]
    fn backup_path_avoids_collisions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".zshrc");
        let first = backup_path(&path, fixed_time());
        fs::write(&first, "").unwrap();
        let second = backup_path(&path, fixed_time());
        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("20260309140507-1"));
    }

    #[test]
    fn copy_keeps_original() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".bashrc");
        fs::write(&path, "alias ll='ls -l'\n").unwrap();
        let backup = copy_to_backup(&path).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(backup).unwrap(), "alias ll='ls -l'\n");
    }

    #[test]
    fn move_removes_original() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".mcp.json");
        fs::write(&path, "{}").unwrap();
        let backup = move_to_backup(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(backup).unwrap(), "{}");
    }

    #[test]
    fn existing_backups_lists_only_matching() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".bashrc");
        fs::write(&path, "").unwrap();
        fs::write(temp.path().join(".bashrc.rigup-backup-20260101000000"), "").unwrap();
        fs::write(temp.path().join(".zshrc.rigup-backup-20260101000000"), "").unwrap();
        assert_eq!(existing_backups(&path).unwrap().len(), 1);
        assert!(existing_backups(&temp.path().join("missing/.bashrc"))
            .unwrap()
            .is_empty());
    }
}
