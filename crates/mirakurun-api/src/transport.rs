// Shared transport configuration for building reqwest::Client instances.
//
// Streaming endpoints stay open for as long as the caller reads them, so the
// default carries no total request timeout, only a connect timeout.

use std::time::Duration;

use crate::error::Error;

/// User agent sent when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("mirakurun-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total deadline for a request, body included. `None` disables it.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    /// Caller-supplied product token, sent in front of [`DEFAULT_USER_AGENT`].
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
        }
    }
}

impl TransportConfig {
    /// The `User-Agent` header value for this configuration.
    pub fn user_agent(&self) -> String {
        match self.user_agent.as_deref() {
            Some(ua) if !ua.is_empty() => format!("{ua} {DEFAULT_USER_AGENT}"),
            _ => DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| Error::Configuration {
            message: format!("failed to build HTTP client: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_is_crate_token() {
        let config = TransportConfig::default();
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert!(DEFAULT_USER_AGENT.starts_with("mirakurun-rs/"));
    }

    #[test]
    fn custom_user_agent_is_prepended() {
        let config = TransportConfig {
            user_agent: Some("epgstation/2.0".into()),
            ..TransportConfig::default()
        };
        assert_eq!(
            config.user_agent(),
            format!("epgstation/2.0 {DEFAULT_USER_AGENT}")
        );
    }

    #[test]
    fn empty_user_agent_falls_back_to_default() {
        let config = TransportConfig {
            user_agent: Some(String::new()),
            ..TransportConfig::default()
        };
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn builds_client_with_timeout() {
        let config = TransportConfig {
            timeout: Some(Duration::from_secs(5)),
            ..TransportConfig::default()
        };
        assert!(config.build_client().is_ok());
    }
}
