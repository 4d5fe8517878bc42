//! Settings discovery and layering.
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. YAML config file (`~/.config/rigup/config.yml` or `--config`)
//! 3. `RIGUP_*` environment flags
//!
//! CLI flags are applied on top by the command layer.

use crate::config::schema::Settings;
use crate::error::{RigupError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the user's config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rigup").join("config.yml"))
}

/// Load a config file, returning defaults when it does not exist.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content).map_err(|e| RigupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load settings from the file layer and the real environment.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    load_settings_with_env(config_path, |key| std::env::var(key))
}

/// Load settings with a custom env var lookup function.
///
/// This allows testing without modifying actual environment variables.
pub fn load_settings_with_env<F>(config_path: Option<&Path>, env_fn: F) -> Result<Settings>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let mut settings = match config_path {
        Some(path) => load_settings_file(path)?,
        None => match default_config_path() {
            Some(path) => load_settings_file(&path)?,
            None => Settings::default(),
        },
    };
    apply_env_overrides(&mut settings, &env_fn)?;
    validate(&settings)?;
    Ok(settings)
}

/// Apply `RIGUP_*` environment flags.
pub fn apply_env_overrides<F>(settings: &mut Settings, env_fn: &F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let get = |key: &str| env_fn(key).ok().filter(|v| !v.trim().is_empty());

    if let Some(v) = get("RIGUP_SOURCE") {
        settings.source = parse_value("RIGUP_SOURCE", &v)?;
    }
    if let Some(v) = get("RIGUP_AUTO_CONFIRM") {
        settings.auto_confirm = parse_flag("RIGUP_AUTO_CONFIRM", &v)?;
    }
    if let Some(v) = get("RIGUP_PERSIST_PATH") {
        settings.persist_path = parse_flag("RIGUP_PERSIST_PATH", &v)?;
    }
    if let Some(v) = get("RIGUP_SKIP_RUNTIME") {
        settings.skip_runtime = parse_flag("RIGUP_SKIP_RUNTIME", &v)?;
    }
    if let Some(v) = get("RIGUP_NODE_PREFERRED") {
        settings.preferred_node_major = parse_value("RIGUP_NODE_PREFERRED", &v)?;
    }
    if let Some(v) = get("RIGUP_NODE_FALLBACK") {
        settings.fallback_node_major = parse_value("RIGUP_NODE_FALLBACK", &v)?;
    }
    if let Some(v) = get("RIGUP_INSTALL_METHOD") {
        settings.install_method = parse_value("RIGUP_INSTALL_METHOD", &v)?;
    }
    if let Some(v) = get("RIGUP_SKIP_WIZARD") {
        settings.skip_wizard = parse_flag("RIGUP_SKIP_WIZARD", &v)?;
    }
    if let Some(v) = get("RIGUP_REGISTER_SERVERS") {
        settings.register_servers = parse_flag("RIGUP_REGISTER_SERVERS", &v)?;
    }
    if let Some(v) = get("RIGUP_REGISTRATION_SCOPE") {
        settings.registration_scope = parse_value("RIGUP_REGISTRATION_SCOPE", &v)?;
    }
    if let Some(v) = get("RIGUP_VALIDATE_LOCATIONS") {
        settings.validate_locations = parse_flag("RIGUP_VALIDATE_LOCATIONS", &v)?;
    }
    if let Some(v) = get("RIGUP_PURGE_PROJECT_CONFIG") {
        settings.purge_project_config = parse_flag("RIGUP_PURGE_PROJECT_CONFIG", &v)?;
    }
    if let Some(v) = get("RIGUP_REPAIR_PROJECT_CONFIG") {
        settings.repair_project_config = parse_flag("RIGUP_REPAIR_PROJECT_CONFIG", &v)?;
    }
    Ok(())
}

/// Parse an on/off flag value.
pub fn parse_flag(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Ok(true),
        "off" | "0" | "false" | "no" => Ok(false),
        other => Err(RigupError::ConfigValidationError {
            message: format!("{} must be on or off, got '{}'", var, other),
        }),
    }
}

fn parse_value<T>(var: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| RigupError::ConfigValidationError {
            message: format!("{}: {}", var, e),
        })
}

/// Check cross-field constraints.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.preferred_node_major == 0 || settings.fallback_node_major == 0 {
        return Err(RigupError::ConfigValidationError {
            message: "runtime major versions must be greater than zero".to_string(),
        });
    }
    if settings.app.command.trim().is_empty() {
        return Err(RigupError::ConfigValidationError {
            message: "app.command must not be empty".to_string(),
        });
    }
    Ok(())
}
