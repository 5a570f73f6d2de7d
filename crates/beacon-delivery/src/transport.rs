//! HTTP transport abstraction.

use crate::dispatcher::DispatcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Async HTTP boundary for the delivery core.
///
/// `None` signals transport failure: no connection, timeout, non-success
/// HTTP status or an unreadable body. The ingest API carries its real status
/// in the response body, so callers only ever see body-or-nothing.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body, returning the raw response body.
    async fn post(&self, url: &str, headers: &[(String, String)], body: String) -> Option<String>;

    /// GET a resource, returning the raw response body.
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Option<String>;
}

/// Transport backed by a shared reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Create a transport honoring the dispatcher's configured timeout.
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self::new(Duration::from_secs(config.timeout_secs))
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Option<String> {
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request rejected");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read response body");
                None
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, headers: &[(String, String)], body: String) -> Option<String> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) => Self::read_body(url, response).await,
            Err(e) => {
                warn!(url = %url, error = %e, "Request failed");
                None
            }
        }
    }

    async fn get(&self, url: &str, headers: &[(String, String)]) -> Option<String> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) => Self::read_body(url, response).await,
            Err(e) => {
                warn!(url = %url, error = %e, "Request failed");
                None
            }
        }
    }
}
