//! Error taxonomy shared by every layer of llmbridge.
//!
//! Four kinds, one enum:
//!
//! | Kind                       | Raised when                              | Status |
//! |----------------------------|------------------------------------------|--------|
//! | `APIKeyError`              | backend credential missing at first use  | 401    |
//! | `TimeoutError`             | backend call exceeded the timeout        | 408    |
//! | `UnsupportedProviderError` | no adapter registered for the provider   | 400    |
//! | `LLMError`                 | anything else (backend or response shape)| 500 or backend status |
//!
//! Typed errors are never re-wrapped: a layer that receives an `LlmError`
//! propagates it with `?` as-is.

use std::fmt;

use crate::types::Provider;

/// Boxed underlying cause kept for inspection.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, LlmError>;

pub const API_KEY_MISSING: &str = "API_KEY_MISSING";
pub const TIMEOUT: &str = "TIMEOUT";
pub const UNSUPPORTED_PROVIDER: &str = "UNSUPPORTED_PROVIDER";
pub const UNSUPPORTED_RESPONSE_FORMAT: &str = "UNSUPPORTED_RESPONSE_FORMAT";
pub const INVALID_MODEL: &str = "INVALID_MODEL";

/// Machine-readable discriminant of an [`LlmError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ApiKey,
    Timeout,
    UnsupportedProvider,
    Llm,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ApiKey => "APIKeyError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::UnsupportedProvider => "UnsupportedProviderError",
            ErrorKind::Llm => "LLMError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure a `generate` call can surface.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The backend API key is not available.
    #[error("API key not found for {provider}. Please set the {env_var} environment variable.")]
    ApiKey {
        provider: Provider,
        env_var: String,
    },

    /// The backend call was abandoned after `timeout_ms`.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        provider: Option<Provider>,
        timeout_ms: u64,
    },

    /// No adapter is registered for the resolved provider.
    #[error("Provider {provider} is not supported")]
    UnsupportedProvider { provider: String },

    /// Generic backend failure or unsupported response shape.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        provider: Option<Provider>,
        code: Option<String>,
        #[source]
        source: Option<BoxError>,
    },
}

impl LlmError {
    /// Generic error with status 500 and no cause.
    pub fn api(message: impl Into<String>, provider: Option<Provider>) -> Self {
        LlmError::Api {
            message: message.into(),
            status: 500,
            provider,
            code: None,
            source: None,
        }
    }

    /// A backend reply whose output shape this crate does not extract from.
    pub fn unsupported_response_format(provider: Provider) -> Self {
        LlmError::Api {
            message: "Unsupported response format".to_string(),
            status: 500,
            provider: Some(provider),
            code: Some(UNSUPPORTED_RESPONSE_FORMAT.to_string()),
            source: None,
        }
    }

    /// The configuration names no model.
    pub fn empty_model(provider: Provider) -> Self {
        LlmError::Api {
            message: "Model identifier must not be empty".to_string(),
            status: 400,
            provider: Some(provider),
            code: Some(INVALID_MODEL.to_string()),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::ApiKey { .. } => ErrorKind::ApiKey,
            LlmError::Timeout { .. } => ErrorKind::Timeout,
            LlmError::UnsupportedProvider { .. } => ErrorKind::UnsupportedProvider,
            LlmError::Api { .. } => ErrorKind::Llm,
        }
    }

    /// HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            LlmError::ApiKey { .. } => 401,
            LlmError::Timeout { .. } => 408,
            LlmError::UnsupportedProvider { .. } => 400,
            LlmError::Api { status, .. } => *status,
        }
    }

    /// The provider that produced the failure, when known.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            LlmError::ApiKey { provider, .. } => Some(*provider),
            LlmError::Timeout { provider, .. } => *provider,
            LlmError::UnsupportedProvider { provider } => provider.parse().ok(),
            LlmError::Api { provider, .. } => *provider,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> Option<&str> {
        match self {
            LlmError::ApiKey { .. } => Some(API_KEY_MISSING),
            LlmError::Timeout { .. } => Some(TIMEOUT),
            LlmError::UnsupportedProvider { .. } => Some(UNSUPPORTED_PROVIDER),
            LlmError::Api { code, .. } => code.as_deref(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
