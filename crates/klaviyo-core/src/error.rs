//! Error types for the Klaviyo client.

use std::fmt;

/// Result type for Klaviyo operations.
pub type Result<T> = std::result::Result<T, KlaviyoError>;

/// Coarse classification of a [`KlaviyoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A local precondition failed; nothing was sent.
    Validation,
    /// The provider answered with an unexpected status.
    Api,
    /// The request never completed a round-trip.
    Transport,
    /// A payload or response body could not be (de)serialized.
    Serialization,
    /// The client was configured with missing or malformed values.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Api => "api",
            Self::Transport => "transport",
            Self::Serialization => "serialization",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when talking to the Klaviyo API.
#[derive(Debug, thiserror::Error)]
pub enum KlaviyoError {
    /// The call was rejected before any request was built.
    #[error("validation error: {message}")]
    Validation {
        /// What was missing or invalid.
        message: String,
    },

    /// Klaviyo returned a status the endpoint does not treat as success.
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Parsed response body, or the raw text as a JSON string.
        body: serde_json::Value,
    },

    /// The transport failed before a response was received.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport failure.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },
}

impl KlaviyoError {
    /// Build a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a transport error from any displayable failure.
    #[must_use]
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    /// Build a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Build an API error from a status and a raw response body.
    ///
    /// JSON bodies are kept structured; anything else is wrapped as a string.
    #[must_use]
    pub fn api(status: u16, raw_body: &str) -> Self {
        let body = serde_json::from_str(raw_body)
            .unwrap_or_else(|_| serde_json::Value::String(raw_body.to_string()));
        Self::Api { status, body }
    }

    /// The kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Api { .. } => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
