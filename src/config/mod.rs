//! Configuration loading and host layout.
//!
//! - Schema definitions in [`schema`]
//! - File and environment layering in [`loader`]
//! - Host directory resolution in [`host`]
//!
//! # Example
//!
//! ```
//! use rigup::config::{load_settings_with_env, Scope};
//! use std::path::Path;
//!
//! let settings = load_settings_with_env(Some(Path::new("/nonexistent/config.yml")), |key| {
//!     match key {
//!         "RIGUP_REGISTRATION_SCOPE" => Ok("project".to_string()),
//!         _ => Err(std::env::VarError::NotPresent),
//!     }
//! })
//! .unwrap();
//! assert_eq!(settings.registration_scope, Scope::Project);
//! ```

pub mod host;
pub mod loader;
pub mod schema;

pub use host::HostLayout;
pub use loader::{
    apply_env_overrides, default_config_path, load_settings, load_settings_file,
    load_settings_with_env, parse_flag, validate,
};
pub use schema::{AppConfig, InstallMethod, Scope, Settings, Source};
