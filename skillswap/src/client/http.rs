//! HTTP client configuration and request execution.

use crate::error::{Error, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default document service base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1/";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("skillswap/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for API requests.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// How often live queries re-fetch their result set.
    pub poll_interval: Duration,
    /// Custom user agent.
    pub custom_user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_secs(1),
            custom_user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Get the user agent to send.
    pub fn user_agent(&self) -> &str {
        self.custom_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve a relative API path to a full URL.
    pub fn resolve_url(&self, api: &str) -> Result<Url> {
        if api.starts_with("http://") || api.starts_with("https://") {
            return Url::parse(api).map_err(Error::Url);
        }

        Url::parse(&self.base_url)
            .and_then(|b| b.join(api))
            .map_err(Error::Url)
    }

    /// URL of a collection, or of one document when `id` is given.
    ///
    /// Each path segment is percent-encoded on its own, so ids may contain
    /// characters such as `/` or `?`.
    pub fn document_url(&self, collection: &str, id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::InvalidArgument(format!("base URL cannot hold a path: {}", self.base_url))
            })?;
            segments.pop_if_empty().push("documents");
            segments.extend(collection.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .build()
        .map_err(Error::Network)
}

/// Unreachable or timed-out service means the store is unavailable.
fn transport_error(e: reqwest::Error) -> Error {
    if e.is_connect() || e.is_timeout() {
        Error::unavailable(e.to_string())
    } else {
        Error::Network(e)
    }
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
    token: Option<String>,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor.
    pub fn new(client: &'a Client, config: &'a HttpConfig, token: Option<String>) -> Self {
        Self {
            client,
            config,
            token,
        }
    }

    /// Build a request with common headers.
    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("User-Agent", self.config.user_agent())
            .header("Accept", "application/json");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Execute a GET request. A 404 yields `None`.
    pub async fn get_json(&self, url: Url) -> Result<Option<Value>> {
        let response = self
            .build_request(Method::GET, url)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Execute a request with a JSON body and return the JSON response.
    pub async fn send_json(&self, method: Method, url: Url, body: &Value) -> Result<Value> {
        log::debug!("{} {}", method, url);
        let response = self
            .build_request(method, url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Map error statuses and decode the body. Empty bodies decode as null.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await.map_err(Error::Network)?;

        if !status.is_success() {
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_owned()
            } else {
                text
            };
            return Err(match status {
                StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::BAD_GATEWAY
                | StatusCode::GATEWAY_TIMEOUT => Error::unavailable(message),
                _ => Error::backend(status.as_u16(), message),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(Error::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let config = HttpConfig::default();

        let url = config.resolve_url("query").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/query");
    }

    #[test]
    fn test_document_url() {
        let config = HttpConfig::default();

        let url = config.document_url("Chats/a_b/messages", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/documents/Chats/a_b/messages");

        let url = config.document_url("Skills", Some("x/y")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/documents/Skills/x%2Fy");
    }

    #[test]
    fn test_document_url_without_trailing_slash() {
        let config = HttpConfig {
            base_url: "https://api.example.com/v2".into(),
            ..Default::default()
        };
        let url = config.document_url("Ratings", Some("r1")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/documents/Ratings/r1");
    }

    #[test]
    fn test_custom_user_agent() {
        let mut config = HttpConfig::default();
        assert!(config.user_agent().starts_with("skillswap/"));
        config.custom_user_agent = Some("tester".into());
        assert_eq!(config.user_agent(), "tester");
    }
}
