//! Registry client JSON documents.
//!
//! Key order is preserved on read and write so unrelated sections of a
//! document the application owns come back exactly as they were.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{RigupError, Result};

/// Section holding registered servers, keyed by name.
pub const SERVERS_KEY: &str = "mcpServers";

/// Read a document. A missing file is `None`; anything but a JSON object is
/// an error.
pub fn read_document(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Some(Map::new()));
    }
    let value: Value =
        serde_json::from_str(&content).map_err(|e| RigupError::RegistryDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(RigupError::RegistryDocument {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        }),
    }
}

/// Write a document as pretty JSON with a trailing newline.
pub fn write_document(path: &Path, document: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// The servers section of a document, if it is an object.
pub fn servers(document: &Map<String, Value>) -> Option<&Map<String, Value>> {
    document.get(SERVERS_KEY).and_then(Value::as_object)
}
