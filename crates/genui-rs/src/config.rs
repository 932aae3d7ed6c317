//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] captures what the HTTP transport needs to reach the
//! generation endpoint. Frontends start from [`ClientConfig::from_env`] and
//! apply CLI overrides with the builder methods.

use std::time::Duration;

use crate::{DEFAULT_ENDPOINT, ENDPOINT_ENV_VAR};

/// Configuration for the generation client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Generation endpoint URL. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Transport-level timeout. Default: `None`; the controller never
    /// applies one of its own.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!("genui/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the endpoint taken from `GENUI_ENDPOINT` when set and
    /// non-empty.
    pub fn from_env() -> Self {
        Self::default().with_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok())
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the endpoint only when `endpoint` is `Some` and non-blank.
    pub fn with_endpoint_override(self, endpoint: Option<String>) -> Self {
        match endpoint {
            Some(e) if !e.trim().is_empty() => self.with_endpoint(e.trim()),
            _ => self,
        }
    }

    /// Set a transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("genui/"));
    }

    #[test]
    fn override_ignores_blank_values() {
        let config = ClientConfig::default().with_endpoint_override(Some("   ".into()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        let config = ClientConfig::default().with_endpoint_override(None);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn override_trims_and_replaces() {
        let config = ClientConfig::default()
            .with_endpoint_override(Some(" http://localhost:8080/gen ".into()));
        assert_eq!(config.endpoint, "http://localhost:8080/gen");
    }

    #[test]
    fn builder_sets_timeout() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
