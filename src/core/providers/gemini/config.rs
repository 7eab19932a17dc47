//! Gemini Configuration

use serde::{Deserialize, Serialize};
use std::env;

use crate::core::providers::error::ProviderError;

/// Configuration for the Google Generative Language API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (Google AI Studio), falls back to `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL
    pub base_url: String,
    /// API version path segment
    pub api_version: String,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Proxy URL (optional)
    pub proxy_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            request_timeout: 300,
            connect_timeout: 10,
            proxy_url: None,
        }
    }
}

impl GeminiConfig {
    /// Create
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Fill the API key from the environment when it is not set
    pub fn with_env_fallback(mut self) -> Self {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty());
        }
        self
    }

    /// Settings
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            ProviderError::configuration("gemini", "GEMINI_API_KEY environment variable is required")
        })
    }

    /// `models/{model}:{operation}` endpoint
    pub fn model_endpoint(&self, model: &str, operation: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        self.resource_endpoint(&format!("models/{}:{}", model, operation))
    }

    /// Endpoint for a resource name such as `batches/123`
    pub fn resource_endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            name.trim_start_matches('/')
        )
    }
}
