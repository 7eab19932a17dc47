//! HTTP plumbing shared by the provider clients

use super::error::ProviderError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// Shared HTTP client builder with common configuration
pub struct HttpClientBuilder {
    provider: &'static str,
    timeout: Duration,
    connect_timeout: Duration,
    proxy_url: Option<String>,
    default_headers: Vec<(String, String)>,
}

impl HttpClientBuilder {
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            proxy_url: None,
            default_headers: Vec::new(),
        }
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = Duration::from_secs(seconds);
        self
    }

    pub fn proxy(mut self, proxy_url: Option<&str>) -> Self {
        self.proxy_url = proxy_url.map(str::to_string);
        self
    }

    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<Client, ProviderError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ProviderError::configuration(self.provider, format!("Invalid header name: {}", key))
            })?;
            // Never echo the value: it is usually a credential
            let value = HeaderValue::from_str(value).map_err(|_| {
                ProviderError::configuration(self.provider, format!("Invalid value for header {}", key))
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .default_headers(headers);

        if let Some(proxy_url) = &self.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                ProviderError::configuration(self.provider, format!("Invalid proxy URL: {}", e))
            })?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(|e| {
            ProviderError::network(self.provider, format!("Failed to create HTTP client: {}", e))
        })
    }
}

/// Send a request and read the body, mapping transport failures
pub async fn send(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<(u16, String), ProviderError> {
    let response: Response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::timeout(provider, e.to_string())
        } else {
            ProviderError::network(provider, format!("Network error: {}", e))
        }
    })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(provider, format!("Failed to read response: {}", e)))?;
    Ok((status, body))
}

/// Parse a successful response body as JSON
pub fn parse_json(provider: &'static str, body: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(body)
        .map_err(|e| ProviderError::response_parsing(provider, format!("Failed to parse JSON: {}", e)))
}
