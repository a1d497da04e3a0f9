use thiserror::Error;

/// Errors that can occur when talking to an upstream source API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Non-success response from the upstream API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The upstream asked us to back off.
    #[error("Rate limited by upstream")]
    RateLimited,

    /// Resource not found (repository, project, workspace).
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Network or transport error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unexpected/internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SourceError {
    #[inline]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is a rate limit error (retryable).
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_include_context() {
        let err = SourceError::api(502, "bad gateway");
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));

        let err = SourceError::not_found("acme/widget");
        assert!(err.to_string().contains("acme/widget"));
    }

    #[test]
    fn only_rate_limited_is_retryable() {
        assert!(SourceError::RateLimited.is_rate_limited());
        assert!(!SourceError::api(500, "boom").is_rate_limited());
        assert!(!SourceError::network("reset").is_rate_limited());
    }
}
