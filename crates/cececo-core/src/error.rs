// ── Core error types ──
//
// Errors surfaced by screens and the match cache. Consumers never match on
// HTTP details; every failure is reduced to a message a listing can show.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the hub: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API errors ───────────────────────────────────────────────────
    /// Non-success answer. `message` is the response body text or the
    /// generic status line when the body was empty.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Unexpected response from the hub: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status of the failed request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cececo_api::Error> for CoreError {
    fn from(err: cececo_api::Error) -> Self {
        let message = err.to_string();
        match err {
            cececo_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed { reason: message }
                } else {
                    CoreError::Api {
                        message,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            cececo_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            cececo_api::Error::InvalidUrl(_) | cececo_api::Error::ClientBuild(_) => {
                CoreError::Config { message }
            }
            cececo_api::Error::Http { status, .. } => CoreError::Api {
                message,
                status: Some(status),
            },
            cececo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
