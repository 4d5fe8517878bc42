//! Error types for rigup operations.
//!
//! This module defines [`RigupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A missing tool is never an error; probes report absence as a value
//! - Step actions return `RigupError` and the executor turns it into a
//!   degraded or halted step, so raw process failures never escape a run
//! - `StepFailed` carries a remedy: the command a user could run by hand

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rigup operations.
#[derive(Debug, Error)]
pub enum RigupError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration value (file or environment flag).
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A provisioning sub-operation could not be completed.
    #[error("Step '{step}' failed: {message}")]
    StepFailed {
        step: String,
        message: String,
        remedy: Option<String>,
    },

    /// External command could not be spawned or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A registry client configuration document is malformed.
    #[error("Invalid registry document {path}: {message}")]
    RegistryDocument { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigupError {
    /// Build a step failure with an optional manual remedy.
    pub fn step(
        step: impl Into<String>,
        message: impl Into<String>,
        remedy: Option<String>,
    ) -> Self {
        RigupError::StepFailed {
            step: step.into(),
            message: message.into(),
            remedy,
        }
    }

    /// The manual command that would fix this error, if known.
    pub fn remedy(&self) -> Option<&str> {
        match self {
            RigupError::StepFailed { remedy, .. } => remedy.as_deref(),
            RigupError::CommandFailed { command, .. } => Some(command),
            _ => None,
        }
    }
}

/// Result type alias for rigup operations.
pub type Result<T> = std::result::Result<T, RigupError>;
