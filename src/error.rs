//! Error types for Quotebook.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Key-value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Stored value for {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote collection endpoint errors.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("quote text is empty")]
    EmptyText,

    #[error("quote category is empty")]
    EmptyCategory,
}

/// Import file errors.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a JSON array of quotes: {reason}")]
    NotAnArray { path: String, reason: String },
}

/// Result type alias for Quotebook.
pub type Result<T> = std::result::Result<T, Error>;
