//! Error types for `overlay-inspect`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use overlay_config::OverlayError;
use thiserror::Error;

/// Errors surfaced by `overlay-inspect`.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Resolving resources or loading properties failed.
    #[error("{0}")]
    Overlay(#[from] Arc<OverlayError>),

    /// Settings could not be gathered or deserialized.
    #[error("invalid settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// An explicitly named settings file does not exist.
    #[error("settings file {0} not found")]
    MissingSettings(Utf8PathBuf),

    /// The requested key is absent and no default was given.
    #[error("no value for '{key}' in section '{section}'")]
    MissingKey {
        /// Section name.
        section: String,
        /// Entry key.
        key: String,
    },

    /// Serializing the snapshot failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for InspectError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}

/// Result alias for `overlay-inspect` operations.
pub type Result<T> = std::result::Result<T, InspectError>;
