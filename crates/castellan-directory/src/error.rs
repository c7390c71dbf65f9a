//! Directory error taxonomy.

use thiserror::Error;

use crate::schema::SchemaError;

/// Error produced by the session pool, the gateway, or schema derivation.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Failed to dial or administratively bind a directory session.
    #[error("directory connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The session pool has been shut down.
    #[error("directory session pool is closed")]
    PoolClosed,

    /// The addressed entry does not exist.
    #[error("directory entry not found: {dn}")]
    NotFound { dn: String },

    /// An entry with the same distinguished name already exists.
    #[error("directory entry already exists: {dn}")]
    AlreadyExists { dn: String },

    /// The directory rejected the presented credentials.
    #[error("invalid directory credentials")]
    InvalidCredentials,

    /// Any other failed directory operation.
    #[error("directory operation failed: {message}")]
    Operation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record schema could not be derived.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DirectoryError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        DirectoryError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with an underlying cause.
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation error.
    pub fn operation(message: impl Into<String>) -> Self {
        DirectoryError::Operation {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation error with an underlying cause.
    pub fn operation_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::Operation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error indicates a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
