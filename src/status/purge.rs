//! Moving project-local registry documents aside.

use std::path::{Path, PathBuf};

use crate::backup::move_to_backup;
use crate::error::Result;
use crate::ui::{Prompt, UserInterface};

/// Prompt key for purge confirmation.
pub const PURGE_PROMPT: &str = "purge-project-config";

/// A document moved to its backup path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedDocument {
    /// Where the document was.
    pub original: PathBuf,
    /// Where it is now.
    pub backup: PathBuf,
}

/// What a purge did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// Documents moved aside.
    pub moved: Vec<MovedDocument>,
    /// The user declined; nothing was touched.
    pub declined: bool,
}

/// Rename each existing document to a timestamped backup. Never deletes.
///
/// Asks first when the UI is interactive and `auto_confirm` is off.
pub fn purge(
    documents: &[PathBuf],
    ui: &mut dyn UserInterface,
    auto_confirm: bool,
) -> Result<PurgeOutcome> {
    let existing: Vec<&Path> = documents
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| p.is_file())
        .collect();
    if existing.is_empty() {
        return Ok(PurgeOutcome::default());
    }

    if ui.is_interactive() && !auto_confirm {
        let names: Vec<String> = existing.iter().map(|p| p.display().to_string()).collect();
        let prompt = Prompt::new(
            PURGE_PROMPT,
            format!("Move {} aside (a backup is kept)?", names.join(", ")),
        );
        if !ui.confirm(&prompt)? {
            return Ok(PurgeOutcome {
                moved: Vec::new(),
                declined: true,
            });
        }
    }

    let mut outcome = PurgeOutcome::default();
    for path in existing {
        let backup = move_to_backup(path)?;
        outcome.moved.push(MovedDocument {
            original: path.to_path_buf(),
            backup,
        });
    }
    Ok(outcome)
}
