//! # Moduleman Core Errors
//!
//! Defines error types for the unit loading machinery.
//!
//! [`ConfigError`] covers loader configuration rejected at construction time.
//! [`UnitLoadError`] covers everything that can go wrong while bringing one
//! unit manifest into existence: the file is missing or unreadable, the JSON
//! cannot be parsed, or the manifest fails semantic validation. Unit load
//! failures are contained by the loaders: they are logged and the affected
//! unit is skipped, they never propagate past `load`.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid value for '{parameter}': path '{path}' must be relative and must not traverse upwards")]
    InvalidRelativePath {
        parameter: &'static str,
        path: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum UnitLoadError {
    #[error("unit file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read unit '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse unit '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid unit manifest '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}
