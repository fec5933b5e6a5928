//! HTTP transport backed by reqwest.
//!
//! Issues GET requests and exposes the response body as an incremental
//! chunk stream so large game data packages are never double-buffered.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, header};
use std::time::Duration;
use url::Url;

use super::{Transport, TransportBody, TransportResponse};
use datapak_core::{AppConfig, Error};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent string (default: "datapak/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { user_agent: "datapak/0.1".to_string(), timeout: Duration::from_millis(20000) }
    }
}

impl From<&AppConfig> for TransportConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// HTTP transfer client.
pub struct HttpTransport {
    http: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transfer(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url_str: &str) -> Result<TransportResponse, Error> {
        let url = Url::parse(url_str).map_err(|e| Error::InvalidUrl(format!("{}: {}", url_str, e)))?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Transfer(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transfer(format!("status {}", status.as_u16())));
        }

        // Taken from the raw header rather than reqwest's decoded view so the
        // caller sees exactly what the server claimed.
        let content_length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        tracing::debug!(%url, ?content_length, "transfer started");

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::Transfer(format!("stream aborted: {}", e))))
            .boxed();

        Ok(TransportResponse { content_length, body: TransportBody::Stream(stream) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.user_agent, "datapak/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20000));
    }

    #[test]
    fn test_transport_config_from_app_config() {
        let app = AppConfig { user_agent: "game/2.0".into(), timeout_ms: 5_000, ..Default::default() };
        let config = TransportConfig::from(&app);
        assert_eq!(config.user_agent, "game/2.0");
        assert_eq!(config.timeout, Duration::from_millis(5_000));
    }

    #[tokio::test]
    async fn test_http_transport_new() {
        let transport = HttpTransport::new(TransportConfig::default());
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let transport = HttpTransport::new(TransportConfig::default()).unwrap();
        let result = transport.fetch("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
