//! Gemini Client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::config::GeminiConfig;
use super::error::GeminiErrorMapper;
use crate::core::providers::error::ProviderError;
use crate::core::providers::shared::{HttpClientBuilder, parse_json, send};
use crate::core::providers::traits::TextProvider;
use crate::core::providers::types::{BatchItem, BatchItemResult, BatchJob};
use crate::core::types::GenerationRequest;

pub(super) const PROVIDER: &str = "gemini";

/// Google Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    pub(super) config: GeminiConfig,
    pub(super) http_client: Client,
}

impl GeminiClient {
    /// Create
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let http_client = HttpClientBuilder::new(PROVIDER)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .proxy(config.proxy_url.as_deref())
            .default_header("x-goog-api-key", config.api_key()?)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// `GenerateContentRequest` body
    pub fn transform_request(request: &GenerationRequest, max_output_tokens: u32) -> Value {
        let mut generation_config = json!({ "maxOutputTokens": max_output_tokens });
        if let Some(temperature) = request.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        json!({
            "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
            "generationConfig": generation_config,
        })
    }

    /// Text of the first candidate, `None` when the model produced none
    pub fn transform_response(response: &Value) -> Result<Option<String>, ProviderError> {
        if let Some(reason) = response
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(|r| r.as_str())
        {
            debug!("Gemini blocked prompt: {}", reason);
            return Ok(None);
        }

        let Some(candidate) = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
        else {
            return Ok(None);
        };

        let text: String = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        Ok((!text.trim().is_empty()).then_some(text))
    }

    pub(super) async fn post(&self, url: &str, body: &Value) -> Result<Value, ProviderError> {
        let (status, text) = send(PROVIDER, self.http_client.post(url).json(body)).await?;
        if !(200..300).contains(&status) {
            return Err(GeminiErrorMapper::from_http_status(status, &text));
        }
        parse_json(PROVIDER, &text)
    }

    pub(super) async fn get(&self, url: &str) -> Result<Value, ProviderError> {
        let (status, text) = send(PROVIDER, self.http_client.get(url)).await?;
        if !(200..300).contains(&status) {
            return Err(GeminiErrorMapper::from_http_status(status, &text));
        }
        parse_json(PROVIDER, &text)
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> Result<Option<String>, ProviderError> {
        let url = self.config.model_endpoint(&request.model, "generateContent");
        debug!("Gemini request URL: {}", url);
        let response = self
            .post(&url, &Self::transform_request(request, max_output_tokens))
            .await?;
        Self::transform_response(&response)
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn submit_batch(
        &self,
        model: &str,
        items: &[BatchItem],
        max_output_tokens: u32,
    ) -> Result<BatchJob, ProviderError> {
        self.create_batch_job(model, items, max_output_tokens).await
    }

    async fn poll_batch(&self, job_name: &str) -> Result<BatchJob, ProviderError> {
        self.get_batch_job(job_name).await.map(|(job, _)| job)
    }

    async fn batch_results(&self, job_name: &str) -> Result<Vec<BatchItemResult>, ProviderError> {
        self.collect_batch_results(job_name).await
    }
}
