//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use roster_config::ConfigError;
use roster_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the student service")]
    #[diagnostic(
        code(roster::connection_failed),
        help(
            "Check that the service is up and the URL is right.\n\
             {reason}\n\
             Try: roster config show"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("student '{identifier}' not found")]
    #[diagnostic(
        code(roster::not_found),
        help("Run: roster students list to see available students")
    )]
    NotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(roster::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(roster::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(roster::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: roster config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(roster::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// A not-found error for `identifier`.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.user_message().to_owned();
        match err {
            CoreError::Network { .. } => CliError::ConnectionFailed { reason: message },
            CoreError::NotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Validation { .. } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Server { status, .. } => CliError::Api { message, status },
        }
    }
}
