// ── Core error types ──
//
// User-facing failures from roster-core. Consumers never see raw HTTP
// status handling or JSON decode errors; the `From<roster_api::Error>`
// impl folds transport-layer errors into four kinds.

use thiserror::Error;

/// Fallback text when a failure carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-2xx response, or a 2xx body that could not be decoded.
    #[error("Server error: {message}")]
    Server { status: Option<u16>, message: String },

    /// Local pre-flight check; never reaches the network.
    #[error("{message}")]
    Validation { message: String },

    /// A successful fetch that carried no entity.
    #[error("Student not found: {identifier}")]
    NotFound { identifier: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// The human-readable text shown to the user.
    pub fn user_message(&self) -> &str {
        let text = match self {
            Self::Network { message }
            | Self::Server { message, .. }
            | Self::Validation { message } => message.as_str(),
            Self::NotFound { .. } => "Student not found",
        };
        if text.trim().is_empty() {
            UNKNOWN_ERROR
        } else {
            text
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<roster_api::Error> for CoreError {
    fn from(err: roster_api::Error) -> Self {
        match err {
            roster_api::Error::Api { status, message } => CoreError::Server {
                status: Some(status),
                message: message
                    .unwrap_or_else(|| format!("Request failed with status code {status}")),
            },
            roster_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Server {
                    status: Some(status.as_u16()),
                    message: e.to_string(),
                },
                None => CoreError::Network {
                    message: e.to_string(),
                },
            },
            roster_api::Error::InvalidUrl(e) => CoreError::Network {
                message: format!("Invalid URL: {e}"),
            },
            roster_api::Error::Tls(message) => CoreError::Network { message },
            roster_api::Error::Deserialization { message, .. } => CoreError::Server {
                status: None,
                message,
            },
        }
    }
}
