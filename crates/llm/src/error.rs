use thiserror::Error;

/// Error types that can occur when interacting with LLM providers.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request/response errors
    #[error("HTTP Error: {0}")]
    HttpError(String),

    /// Authentication and authorization errors
    #[error("Auth Error: {0}")]
    AuthError(String),

    /// Invalid request parameters or format
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// Errors returned by the LLM provider
    #[error("Provider Error: {0}")]
    ProviderError(String),

    /// API response parsing or format error
    #[error("Response Format Error: {message}. Raw response: {raw_response}")]
    ResponseFormatError { message: String, raw_response: String },

    /// JSON serialization/deserialization errors
    #[error("JSON Parse Error: {0}")]
    JsonError(String),

    /// Generic error
    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        LLMError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
