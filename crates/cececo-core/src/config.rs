// ── Runtime hub configuration ──
//
// Describes which hub to talk to and how screens size their requests.
// Never touches disk: the CLI builds a `HubConfig` and hands it in.

use std::time::Duration;

use cececo_api::{HubClient, TransportConfig};

use crate::error::CoreError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for talking to a single hub deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Hub base URL (e.g. `https://hub.example.org`). A trailing slash is
    /// ignored.
    pub base_url: String,
    /// Upper bound for every request.
    pub timeout: Duration,
    /// `limit` sent with match requests.
    pub match_limit: u32,
    /// Matches shown in a collapsed match panel.
    pub preview: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            match_limit: 50,
            preview: 3,
        }
    }
}

impl HubConfig {
    /// Build the API client described by this config.
    pub fn client(&self) -> Result<HubClient, CoreError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        Ok(HubClient::new(&self.base_url, &transport)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_client_points_at_localhost() {
        let client = HubConfig::default().client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let config = HubConfig {
            base_url: "::nope".into(),
            ..HubConfig::default()
        };
        assert!(matches!(config.client(), Err(CoreError::Config { .. })));
    }
}
