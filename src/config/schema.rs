//! Settings schema.
//!
//! Every field has a default, so an empty or missing config file yields a
//! working configuration. Unknown keys are rejected to catch typos.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the application is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Clone the application's repository and install from the checkout.
    Git,
    /// Install the published package.
    #[default]
    Registry,
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "registry" => Ok(Self::Registry),
            other => Err(format!("expected git or registry, got '{}'", other)),
        }
    }
}

/// How the application is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    /// `npm` when npm is available, otherwise `native`.
    #[default]
    Auto,
    /// Global npm install.
    Npm,
    /// Vendor installer script.
    Native,
}

impl FromStr for InstallMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "npm" => Ok(Self::Npm),
            "native" => Ok(Self::Native),
            other => Err(format!("expected auto, npm or native, got '{}'", other)),
        }
    }
}

/// Visibility of a registered plugin server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Registered once, visible from every working directory.
    #[default]
    User,
    /// Registered into the project directory's local document only.
    Project,
}

impl Scope {
    /// Name used on the registry client's command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "user",
            Scope::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "project" => Ok(Self::Project),
            other => Err(format!("expected user or project, got '{}'", other)),
        }
    }
}

/// The application being provisioned and its registry client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Executable name; also the registry client.
    pub command: String,
    /// Package name for npm installs.
    pub package: String,
    /// Repository cloned when the source is `git`.
    pub repository: String,
    /// Installer script URL for the native method.
    pub installer_url: String,
    /// User-scope registry document, relative to home.
    pub user_document: String,
    /// Project-scope registry document, relative to the project directory.
    pub project_document: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            package: "@anthropic-ai/claude-code".to_string(),
            repository: "https://github.com/anthropics/claude-code.git".to_string(),
            installer_url: "https://claude.ai/install.sh".to_string(),
            user_document: ".claude.json".to_string(),
            project_document: ".mcp.json".to_string(),
        }
    }
}

/// Resolved engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where the application comes from.
    pub source: Source,
    /// Accept confirmation prompts without asking.
    pub auto_confirm: bool,
    /// Write PATH fixes into shell startup files.
    pub persist_path: bool,
    /// Leave runtime installation to the user.
    pub skip_runtime: bool,
    /// Preferred runtime major version.
    pub preferred_node_major: u32,
    /// Runtime major version used when the preferred one fails.
    pub fallback_node_major: u32,
    /// Application install method.
    pub install_method: InstallMethod,
    /// Mark the application's first-run wizard as completed.
    pub skip_wizard: bool,
    /// Register the plugin server catalog.
    pub register_servers: bool,
    /// Registration scope.
    pub registration_scope: Scope,
    /// Compare registrations between home and the project directory.
    pub validate_locations: bool,
    /// Move project-local registry documents aside.
    pub purge_project_config: bool,
    /// Copy user-scope entries missing from the project document.
    pub repair_project_config: bool,
    /// Application details.
    pub app: AppConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: Source::default(),
            auto_confirm: false,
            persist_path: true,
            skip_runtime: false,
            preferred_node_major: 22,
            fallback_node_major: 20,
            install_method: InstallMethod::default(),
            skip_wizard: true,
            register_servers: true,
            registration_scope: Scope::default(),
            validate_locations: false,
            purge_project_config: false,
            repair_project_config: false,
            app: AppConfig::default(),
        }
    }
}
