//! Provider error handling.

use thiserror::Error;

/// User-facing text for a provider request that timed out.
pub const TIMEOUT_MESSAGE: &str = "Request timed out error!";

/// Errors returned by an AI provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The HTTP client gave up waiting for the provider.
    #[error("Request timed out error!")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Connection-level failure before a response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered successfully but the payload was unusable.
    #[error("Invalid response format from provider: {0}")]
    InvalidResponseFormat(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ProviderError {
    /// Returns true for [`ProviderError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// HTTP status code, when the provider returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classifies a transport error, separating timeouts from other failures.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(error.to_string())
        }
    }
}
