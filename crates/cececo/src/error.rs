//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cececo_config::ConfigError;
use cececo_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the hub")]
    #[diagnostic(
        code(cececo::connection_failed),
        help(
            "Check that the hub API is running and reachable.\n\
             Reason: {reason}\n\
             Set the address with --api-base or CECECO_API_BASE."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(cececo::timeout),
        help("Increase the timeout with --timeout or check hub responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cececo::not_found),
        help("Run: cececo {list_command} to see available entries")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(cececo::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Unexpected response from the hub: {message}")]
    #[diagnostic(
        code(cececo::decode),
        help("The hub may be running an incompatible version. Re-run with -vv for details.")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cececo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(cececo::config),
        help("Inspect the resolved settings with: cececo config show")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. }
            | Self::Api {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Api { message, status } => CliError::Api { message, status },
            CoreError::Decode { message } => CliError::Decode { message },
            CoreError::Config { message } => CliError::Validation {
                field: "api_base".into(),
                reason: message,
            },
        }
    }
}

impl From<cececo_api::Error> for CliError {
    fn from(err: cececo_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_body_keeps_message_and_exit_code() {
        let err = CliError::from(CoreError::Api {
            message: "Project not found".into(),
            status: Some(404),
        });
        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn timeout_maps_to_timeout_code() {
        let err = CliError::from(CoreError::Timeout { timeout_secs: 3 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn server_errors_are_general() {
        let err = CliError::from(CoreError::Api {
            message: "request failed with status 500".into(),
            status: Some(500),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
