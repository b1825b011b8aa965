//! Error types for Colloquy.

use thiserror::Error;

/// Primary error type for all Colloquy operations.
#[derive(Error, Debug)]
pub enum ColloquyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Operation canceled")]
    Canceled,

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool resolution limit exceeded after {limit} rounds")]
    ToolResolutionLimitExceeded { limit: usize },

    #[error("Session repository error for '{session_id}': {message}")]
    Repository { session_id: String, message: String },

    #[error("Retrieval error: {0}")]
    Retrieval(String),
}

/// Broad error category, one per failure class a caller has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Provider,
    ToolDispatch,
    Persistence,
    Retrieval,
    Network,
    Timeout,
    RateLimit,
    Authentication,
    Configuration,
    Canceled,
    Unknown,
}

impl ColloquyError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a repository error for a session.
    pub fn repository(session_id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Repository {
            session_id: session_id.into(),
            message: message.to_string(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidArgument(_) => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Canceled => ErrorCategory::Canceled,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                _ => ErrorCategory::Provider,
            },
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::ToolNotFound(_)
            | Self::ToolExecution { .. }
            | Self::ToolResolutionLimitExceeded { .. } => ErrorCategory::ToolDispatch,
            Self::Repository { .. } => ErrorCategory::Persistence,
            Self::Retrieval(_) => ErrorCategory::Retrieval,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => matches!(
                self.category(),
                ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Timeout
            ),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ColloquyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        assert!(ColloquyError::api(503, "unavailable").is_retryable());
        assert!(ColloquyError::RateLimited { retry_after_ms: None }.is_retryable());
        assert!(!ColloquyError::api(400, "bad request").is_retryable());
    }

    #[test]
    fn tool_failures_are_dispatch_errors() {
        let err = ColloquyError::ToolExecution {
            tool_name: "get_weather".into(),
            message: "boom".into(),
        };
        assert_eq!(err.category(), ErrorCategory::ToolDispatch);
        assert!(!err.is_retryable());
        assert_eq!(
            ColloquyError::ToolResolutionLimitExceeded { limit: 3 }.category(),
            ErrorCategory::ToolDispatch
        );
    }

    #[test]
    fn validation_and_persistence_are_distinct() {
        assert_eq!(
            ColloquyError::Validation("empty prompt".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ColloquyError::repository("s1", "disk full").category(),
            ErrorCategory::Persistence
        );
    }

    #[test]
    fn unauthorized_api_status_maps_to_authentication() {
        assert_eq!(ColloquyError::api(401, "nope").category(), ErrorCategory::Authentication);
    }
}
