//! Error types for the scaffold generator

use std::path::PathBuf;

use thiserror::Error;

/// Result type for scaffold operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Scaffold generator errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown template set: {0} (expected one of: crud, api, ui)")]
    UnknownTemplate(String),

    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),

    #[error("Template error in {template}: {message}")]
    Template { template: String, message: String },

    #[error("Generated path must be a normal relative path: {}", .0.display())]
    UnsafePath(PathBuf),

    #[error("Lint failed with {0} error(s)")]
    LintFailed(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl ScaffoldError {
    pub(crate) fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        ScaffoldError::Template {
            template: template.into(),
            message: message.into(),
        }
    }
}
