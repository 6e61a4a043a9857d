//! Error types for sw-core

use thiserror::Error;

/// Core error type for Setwise
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Column name declared twice in one schema
    #[error("[E003] Duplicate column '{column}' in schema")]
    DuplicateColumn { column: String },

    /// E004: Column declared with an empty name
    #[error("[E004] Column at position {position} has an empty name")]
    EmptyColumnName { position: usize },

    /// E005: IO error with file path context
    #[error("[E005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E006: YAML parse error
    #[error("[E006] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
