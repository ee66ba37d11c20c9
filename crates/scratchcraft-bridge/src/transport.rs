//! HTTP transport to the game server
//!
//! One GET per call against `base_address + path`. The path is appended
//! verbatim; no segment encoding is done here. Only network-level failures
//! are errors: a completed response is returned whatever its status.

use async_trait::async_trait;
use scratchcraft_core::{BridgeError, Result};
use std::time::Duration;
use tracing::debug;

/// A completed response from the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing a single request to the game server
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// GET `path` and return the status and full response body
    async fn get(&self, path: &str) -> Result<Reply>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_address: String,
}

impl HttpTransport {
    /// Create a transport for `base_address`, bounding each request by `timeout`
    pub fn new(base_address: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_address: base_address.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_address, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Reply> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BridgeError::Transport(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Transport(format!("GET {} body failed: {}", url, e)))?;

        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
        }

        debug!("GET {} -> {} bytes", url, body.len());
        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeGame;

    #[tokio::test]
    async fn test_url_joins_path() {
        let transport =
            HttpTransport::new("http://127.0.0.1:8088/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_address(), "http://127.0.0.1:8088");
        assert_eq!(
            transport.url("/moveDrone/fwd/1"),
            "http://127.0.0.1:8088/moveDrone/fwd/1"
        );
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let game = FakeGame::start("blockType 1\nblockData 0").await;
        let transport = HttpTransport::new(game.address(), Duration::from_secs(2)).unwrap();

        let reply = transport.get("/poll").await.unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "blockType 1\nblockData 0");

        transport.get("/summon/Pig").await.unwrap();
        assert_eq!(game.requests(), vec!["/summon/Pig".to_string()]);
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let game = FakeGame::start("").await;
        let transport = HttpTransport::new(game.address(), Duration::from_secs(2)).unwrap();

        let reply = transport.get("/broken").await.unwrap();
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, "boom");
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let transport =
            HttpTransport::new(crate::test_support::UNREACHABLE, Duration::from_secs(2)).unwrap();

        let result = transport.get("/poll").await;
        assert!(matches!(result, Err(BridgeError::Transport(_))));
    }
}
