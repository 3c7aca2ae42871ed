//! Error types for solena-core

use thiserror::Error;

/// Main error type for the solena-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Record store database error
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored document failed strict schema validation
    #[error("schema error in {collection}: {message}")]
    Schema { collection: String, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// External session provider error
    #[error("provider error: {0}")]
    Provider(String),

    /// Conversation record not found
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    /// Invalid input to a mutation entry point
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Build a schema error for a document in the given collection.
    pub fn schema(collection: &str, message: impl Into<String>) -> Self {
        Error::Schema {
            collection: collection.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for solena-core
pub type Result<T> = std::result::Result<T, Error>;
