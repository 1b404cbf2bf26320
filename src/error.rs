//! Error types for the onboarding crate.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Document store errors.
///
/// `Write` carries the backend's own message and displays it unchanged, so
/// the flow can surface it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Write(String),

    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Errors addressing form fields by name.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown form field: {0}")]
    Unknown(String),

    #[error("Education item {0} not found")]
    EducationItemNotFound(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
