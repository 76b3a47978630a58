//! Error types for model building and regeneration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the generator library.
#[derive(Debug, Error)]
pub enum GenError {
    /// A port-level filesystem operation failed.
    #[error("filesystem error at {}: {message}", path.display())]
    FileSystem {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Message reported by the filesystem adapter.
        message: String,
    },

    /// The model snapshot could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] serde_yaml::Error),

    /// A template could not be registered or rendered.
    #[error("template error in '{name}': {message}")]
    Template {
        /// Name of the failing template.
        name: String,
        /// Message reported by the template engine.
        message: String,
    },

    /// A class, attribute, role, or package name is not a valid identifier.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A model element refers to a class that does not exist.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// The model definition file is inconsistent.
    #[error("model definition error: {0}")]
    Definition(String),
}

impl GenError {
    /// Wraps an adapter error raised while touching `path`.
    pub(crate) fn fs(path: impl Into<PathBuf>, err: &(dyn std::error::Error + Send + Sync)) -> Self {
        Self::FileSystem { path: path.into(), message: err.to_string() }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, GenError>;
