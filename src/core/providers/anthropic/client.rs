//! Anthropic Client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::config::AnthropicConfig;
use super::error::AnthropicErrorMapper;
use crate::core::providers::error::ProviderError;
use crate::core::providers::shared::{HttpClientBuilder, parse_json, send};
use crate::core::providers::traits::TextProvider;
use crate::core::types::GenerationRequest;

const PROVIDER: &str = "anthropic";

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    config: AnthropicConfig,
    http_client: Client,
}

impl AnthropicClient {
    /// Create
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let http_client = HttpClientBuilder::new(PROVIDER)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .proxy(config.proxy_url.as_deref())
            .default_header("x-api-key", config.api_key()?)
            .default_header("anthropic-version", config.api_version.clone())
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Request body for the Messages API
    pub fn transform_request(request: &GenerationRequest, max_output_tokens: u32) -> Value {
        let mut body = json!({
            "model": request.model,
            "max_tokens": max_output_tokens,
            "messages": [{"role": "user", "content": request.prompt}],
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Concatenated text blocks, `None` when there are none
    pub fn transform_response(response: &Value) -> Result<Option<String>, ProviderError> {
        let content = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| ProviderError::response_parsing(PROVIDER, "No content in response"))?;

        let text: String = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();

        Ok((!text.trim().is_empty()).then_some(text))
    }
}

#[async_trait]
impl TextProvider for AnthropicClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> Result<Option<String>, ProviderError> {
        let url = self.config.endpoint("/v1/messages");
        let body = Self::transform_request(request, max_output_tokens);
        debug!("Anthropic request to {} with model {}", url, request.model);

        let (status, text) = send(PROVIDER, self.http_client.post(&url).json(&body)).await?;
        if !(200..300).contains(&status) {
            return Err(AnthropicErrorMapper::from_http_status(status, &text));
        }

        Self::transform_response(&parse_json(PROVIDER, &text)?)
    }
}
