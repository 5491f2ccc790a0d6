//! Client configuration types.

use std::time::Duration;

/// Configuration for a daemon client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Daemon host, with or without a scheme (e.g. `http://127.0.0.1`).
    pub host: String,
    /// Daemon API port.
    pub port: u16,
    /// Request timeout, honored by the transport collaborator.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1".to_owned(),
            port: 5001,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given host and port, with the
    /// default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the daemon host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the daemon API port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            timeout: self.timeout.unwrap_or(defaults.timeout),
        }
    }
}
