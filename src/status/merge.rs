//! Non-destructive merge of user-scope entries into a project document.

use std::path::Path;

use serde_json::{Map, Value};

use crate::document::{read_document, servers, write_document, SERVERS_KEY};
use crate::error::{RigupError, Result};

/// What a repair did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entries copied into the project document, in user-document order.
    pub inserted: Vec<String>,
    /// Whether the project document was rewritten.
    pub written: bool,
}

/// Insert every user entry whose name the project lacks.
///
/// Existing project entries are never touched. Returns the inserted names.
pub fn merge_servers(user: &Map<String, Value>, project: &mut Map<String, Value>) -> Vec<String> {
    let mut inserted = Vec::new();
    for (name, spec) in user {
        if !project.contains_key(name) {
            project.insert(name.clone(), spec.clone());
            inserted.push(name.clone());
        }
    }
    inserted
}

/// Names [`repair_merge`] would insert, without writing anything.
pub fn missing_entries(user_document: &Path, project_document: &Path) -> Result<Vec<String>> {
    let (Some(user), Some(project)) = (
        read_document(user_document)?,
        read_document(project_document)?,
    ) else {
        return Ok(Vec::new());
    };
    let Some(user_servers) = servers(&user) else {
        return Ok(Vec::new());
    };
    let existing = servers(&project);
    Ok(user_servers
        .keys()
        .filter(|name| !existing.is_some_and(|s| s.contains_key(*name)))
        .cloned()
        .collect())
}

/// Copy user-scope entries missing from the project document into it.
///
/// The project document is written back only when something was inserted.
/// Nothing is created when either document is missing.
pub fn repair_merge(user_document: &Path, project_document: &Path) -> Result<MergeOutcome> {
    let Some(user) = read_document(user_document)? else {
        tracing::debug!("no user document at {}", user_document.display());
        return Ok(MergeOutcome::default());
    };
    let Some(mut project) = read_document(project_document)? else {
        tracing::debug!("no project document at {}", project_document.display());
        return Ok(MergeOutcome::default());
    };
    let Some(user_servers) = servers(&user) else {
        return Ok(MergeOutcome::default());
    };

    let section = project
        .entry(SERVERS_KEY.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(project_servers) = section else {
        return Err(RigupError::RegistryDocument {
            path: project_document.to_path_buf(),
            message: format!("'{}' is not an object", SERVERS_KEY),
        });
    };

    let inserted = merge_servers(user_servers, project_servers);
    if inserted.is_empty() {
        return Ok(MergeOutcome::default());
    }

    write_document(project_document, &project)?;
    tracing::debug!(
        "copied {} into {}",
        inserted.join(", "),
        project_document.display()
    );
    Ok(MergeOutcome {
        inserted,
        written: true,
    })
}
