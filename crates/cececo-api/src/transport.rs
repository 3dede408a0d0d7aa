// Shared transport configuration for building reqwest::Client instances.
//
// Keeps timeout and user-agent settings in one place so every request the
// hub client issues is bounded the same way.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("cececo/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a single request, connect to last body byte.
    pub timeout: Duration,
    /// Optional override for the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
