/*
[INPUT]:  HTTP configuration (base URL, timeouts, bearer token)
[OUTPUT]: Configured reqwest client with connection-level retry
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing retry behavior
*/

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

use crate::http::{OpenNewsError, Result};

/// Default base URL for the OpenNews REST API
pub const DEFAULT_API_BASE_URL: &str = "https://ai.6551.io";

/// Extra attempts after the first request fails at the connection level
const MAX_RETRIES: usize = 2;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the OpenNews REST API
#[derive(Debug)]
pub struct OpenNewsClient {
    http_client: Client,
    base_url: Url,
    token: String,
    config: ClientConfig,
}

impl OpenNewsClient {
    /// Create a new client with default configuration
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), token)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, token: impl Into<String>) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_API_BASE_URL, token)
    }

    /// Create a new client against a non-default base URL
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        token: impl Into<String>,
    ) -> Result<Self> {
        let token = token.into();
        let http_client = Self::build_http_client(&config, &token)?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            token,
            config,
        })
    }

    fn build_http_client(config: &ClientConfig, token: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| OpenNewsError::Config(format!("invalid API token: {err}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()?;
        Ok(client)
    }

    /// Execute a request and decode the JSON response.
    ///
    /// Connection-level failures are retried up to 2 extra times with the
    /// underlying client (and its connection pool) recreated between
    /// attempts. HTTP error statuses are never retried.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(endpoint)?;
        let mut client = self.http_client.clone();
        let mut attempt = 0;

        loop {
            let mut builder = client.request(method.clone(), url.clone());
            if let Some(body) = body {
                builder = builder.json(body);
            }

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json().await?);
                    }
                    let message = response.text().await.unwrap_or_default();
                    if status == StatusCode::UNAUTHORIZED {
                        return Err(OpenNewsError::Authentication { message });
                    }
                    return Err(OpenNewsError::api_error(status, message));
                }
                Err(err) if is_connection_error(&err) && attempt < MAX_RETRIES => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_attempts = MAX_RETRIES + 1,
                        error = %err,
                        endpoint,
                        "connection error, recreating client"
                    );
                    client = Self::build_http_client(&self.config, &self.token)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_connection_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
