//! Network side of the fetch cache.

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::error;

use super::FetchError;

/// Fetches a URL and parses its body as JSON.
pub trait Transport: Send + Sync {
    /// Perform one GET request.
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cyberduck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| {
            error!(
                url = %url,
                error = %source,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse upstream JSON"
            );
            FetchError::Parse {
                url: url.to_owned(),
                source,
            }
        })
    }
}
