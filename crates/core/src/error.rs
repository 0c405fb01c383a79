//! Error types for the Vocalis domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum, folded into [`Error`].

use thiserror::Error;

/// The top-level error type for all Vocalis operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Lookup errors ---
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    // --- Input errors ---
    #[error("Validation error: {0}")]
    Validation(String),

    // --- Reasoning service errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Registry errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Speech synthesis errors ---
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// The three caller-visible failure signals, plus a bucket for the rest.
///
/// The HTTP layer maps these to status codes; the core never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown agent id.
    NotFound,
    /// Missing or empty required input; nothing was mutated.
    InvalidInput,
    /// The reasoning service failed or answered with a non-success status.
    Upstream,
    /// Anything else.
    Internal,
}

impl Error {
    /// Shorthand for an unknown agent id.
    pub fn agent_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Agent",
            id: id.into(),
        }
    }

    /// Classify this error for the embedding layer.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Validation(_) => ErrorCategory::InvalidInput,
            Self::Provider(_) => ErrorCategory::Upstream,
            Self::Store(_) | Self::Speech(_) | Self::Config { .. } | Self::Serialization(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The reasoning service answered with a non-success HTTP status.
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A success status whose body was not JSON at all.
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// The upstream HTTP status, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech synthesis not configured: {0}")]
    NotConfigured(String),

    #[error("Speech API request failed (status: {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_status() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 503,
            message: "Service Unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn not_found_names_the_id() {
        let err = Error::agent_not_found("missing-id");
        assert_eq!(err.to_string(), "Agent not found: missing-id");
    }

    #[test]
    fn categories_distinguish_three_signals() {
        assert_eq!(
            Error::agent_not_found("x").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            Error::Validation("Name is required".into()).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            Error::from(ProviderError::Network("refused".into())).category(),
            ErrorCategory::Upstream
        );
        assert_eq!(
            Error::from(SpeechError::NotConfigured("no key".into())).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn status_code_only_for_api_errors() {
        let api = ProviderError::ApiError {
            status_code: 401,
            message: String::new(),
        };
        assert_eq!(api.status_code(), Some(401));
        assert_eq!(ProviderError::Network("x".into()).status_code(), None);
    }
}
