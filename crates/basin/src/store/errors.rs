use sea_orm::DbErr;
use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// A required parent entity is missing, typically because no prior full
    /// sync has run.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Invalid input to a store operation.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
