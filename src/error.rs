//! Error types for schema conversion and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("type '{type_name}' is not a supported type (at {path})")]
    UnsupportedType {
        /// The offending type after alias remapping.
        type_name: String,
        /// JSON Pointer fragment of the node, `#` for the root.
        path: String,
    },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::UnsupportedType { .. } => 2,
        }
    }
}

/// Errors while loading schemas and options.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid options in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    // Schema errors (exit code 2)
    #[error("fragment not found: {fragment}")]
    FragmentNotFound { fragment: String },

    #[error("schema must be an object, got {actual}")]
    NotAnObject { actual: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
