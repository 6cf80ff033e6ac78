//! Error types shared across the crate.

use crate::config::ConfigError;

/// Errors produced while building or submitting an outbound call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VoiceError {
    /// A call setting was given a value outside its accepted set.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A phone number failed validation.
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// A non-phone endpoint failed validation.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP request could not be sent or its response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The voice API answered with a non-success status.
    #[error("voice API request failed ({status}): {body}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = VoiceError> = std::result::Result<T, E>;
