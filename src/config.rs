//! Client configuration.
//!
//! There is no global settings object; each client receives its own config
//! value at construction time.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the key-authenticated [`SandboxClient`](crate::api::SandboxClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for establishing TCP/TLS connections.
    pub connect_timeout: Duration,

    /// Default per-request read timeout. Scan creation and transfers
    /// compute their own, longer timeouts.
    pub read_timeout: Duration,

    /// Total timeout for one upload request.
    pub upload_timeout: Duration,

    /// Read timeout for artifact downloads.
    pub download_timeout: Duration,

    /// Maximum number of concurrent uploads per client instance.
    pub upload_concurrency: usize,

    /// Accept self-signed TLS certificates. On-premise appliances
    /// normally ship without a publicly trusted certificate.
    pub accept_invalid_certs: bool,

    /// Optional proxy URL (`http://`, `https://` or `socks5://`).
    pub proxy: Option<String>,

    /// Directory where raw bodies of responses that failed schema
    /// validation are written for offline diagnosis. `None` disables the
    /// dumps; the error still carries the payload either way.
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(20),
            read_timeout: Duration::from_secs(40),
            upload_timeout: Duration::from_secs(300),
            download_timeout: Duration::from_secs(120),
            upload_concurrency: 4,
            accept_invalid_certs: true,
            proxy: None,
            debug_dump_dir: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the default read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the upload timeout.
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Sets the artifact download read timeout.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Sets the upload concurrency bound. Values below 1 are clamped to 1.
    pub fn with_upload_concurrency(mut self, limit: usize) -> Self {
        self.upload_concurrency = limit.max(1);
        self
    }

    /// Enables or disables acceptance of self-signed certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Routes all traffic through the given proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Enables raw-payload dumps for failed deserializations.
    pub fn with_debug_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dump_dir = Some(dir.into());
        self
    }
}

/// Configuration for the session-authenticated [`UiClient`](crate::ui::UiClient).
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Timeout for establishing TCP/TLS connections.
    pub connect_timeout: Duration,

    /// Per-request read timeout.
    pub read_timeout: Duration,

    /// How long an access token is considered fresh before it is
    /// re-fetched.
    pub token_lifetime: Duration,

    /// Accept self-signed TLS certificates.
    pub accept_invalid_certs: bool,

    /// Optional proxy URL.
    pub proxy: Option<String>,

    /// Directory for raw-payload dumps of failed deserializations.
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(40),
            read_timeout: Duration::from_secs(120),
            token_lifetime: Duration::from_secs(300),
            accept_invalid_certs: true,
            proxy: None,
            debug_dump_dir: None,
        }
    }
}

impl UiConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the token lifetime.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Enables or disables acceptance of self-signed certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Routes all traffic through the given proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Enables raw-payload dumps for failed deserializations.
    pub fn with_debug_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dump_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.upload_concurrency, 4);
        assert_eq!(config.download_timeout, Duration::from_secs(120));
        assert!(config.debug_dump_dir.is_none());
    }

    #[test]
    fn upload_concurrency_clamped() {
        let config = ClientConfig::new().with_upload_concurrency(0);
        assert_eq!(config.upload_concurrency, 1);
    }

    #[test]
    fn ui_builder() {
        let config = UiConfig::new()
            .with_token_lifetime(Duration::from_secs(60))
            .with_proxy("socks5://127.0.0.1:9050");
        assert_eq!(config.token_lifetime, Duration::from_secs(60));
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
    }
}
