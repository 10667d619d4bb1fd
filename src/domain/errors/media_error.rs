//! Media store error types.

use thiserror::Error;

/// Failure of a single media store request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum MediaError {
    #[error("network error talking to media store: {message}")]
    Network { message: String },

    #[error("media store rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected media store response: {message}")]
    InvalidResponse { message: String },

    #[error("media store not configured: {message}")]
    NotConfigured { message: String },
}

impl MediaError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates rejection error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates missing configuration error.
    #[must_use]
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    /// Returns whether a later attempt could succeed without operator action.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } | Self::NotConfigured { .. } => false,
        }
    }
}
