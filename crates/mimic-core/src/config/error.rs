//! Error types for fixture and options loading.

use thiserror::Error;

/// Fixture or options file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Unknown file type
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    /// Invalid glob pattern
    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    /// Pattern matched no files
    #[error("No files match '{0}'")]
    NoFiles(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
