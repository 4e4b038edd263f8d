//! Error types.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Configuration directory not found")]
    NoConfigDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Container errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("Unknown icon: {0}")]
    UnknownIcon(String),
    #[error("Icon already present: {0}")]
    DuplicateIcon(String),
    #[error("Nothing selected to drag")]
    EmptySelection,
}

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
