//! Client configuration options.

use std::time::Duration;

/// Configuration for the Belvo client.
///
/// The client is deliberately plain: no retries, no backoff, no rate
/// limiting. The only knobs are the transport timeout and the User-Agent.
///
/// # Example
///
/// ```
/// use belvo_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("belvo-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("belvo-rs/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("scripted-import/2.1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "scripted-import/2.1");
    }
}
