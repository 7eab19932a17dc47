//! Text-generation gateway
//!
//! One entry point over both provider tiers. Every call is looked up in the
//! generation cache by its request descriptor, throttled by a shared
//! admission limit and retried on transient provider faults.

mod batch;
mod generate;
pub mod types;


pub use types::{BatchCollection, GenerateOptions};

use crate::config::{AppConfig, GatewayConfig};
use crate::core::batching::unresolved_placeholders;
use crate::core::cache::GenerationCache;
use crate::core::providers::{AnthropicClient, GeminiClient, TextProvider};
use crate::core::types::{GenerationRequest, ModelTier};
use crate::utils::error::{Bulkhead, GatewayError, Result, RetryConfig, RetryPolicy};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

/// Gateway over the cost and quality tiers
pub struct Gateway {
    cost: Arc<dyn TextProvider>,
    quality: Arc<dyn TextProvider>,
    cache: GenerationCache,
    admission: Bulkhead,
    retry: RetryPolicy,
    cost_model: String,
    quality_model: String,
    temperature: Option<f64>,
    max_output_tokens: u32,
    poll_interval: Duration,
    provider_calls: AtomicU64,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("cost", &self.cost.name())
            .field("quality", &self.quality.name())
            .field("cost_model", &self.cost_model)
            .field("quality_model", &self.quality_model)
            .field("admission", &self.admission.max_concurrent())
            .finish()
    }
}

impl Gateway {
    /// Create
    pub fn new(
        cost: Arc<dyn TextProvider>,
        quality: Arc<dyn TextProvider>,
        cache: GenerationCache,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            cost,
            quality,
            cache,
            admission: Bulkhead::new("providers", config.admission_limit),
            retry: RetryPolicy::new(RetryConfig::from(&config.retry)),
            cost_model: config.cost_model.clone(),
            quality_model: config.quality_model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            poll_interval: config.batch_poll_interval(),
            provider_calls: AtomicU64::new(0),
        }
    }

    /// Gemini for the cost tier, Anthropic for the quality tier
    pub fn from_config(config: &AppConfig, cache: GenerationCache) -> Result<Self> {
        let cost = GeminiClient::new(config.providers.gemini.clone())?;
        let quality = AnthropicClient::new(config.providers.anthropic.clone())?;
        info!(
            "Gateway ready: cost tier {} ({}), quality tier {} ({}), admission limit {}",
            cost.name(),
            config.gateway.cost_model,
            quality.name(),
            config.gateway.quality_model,
            config.gateway.admission_limit
        );
        Ok(Self::new(Arc::new(cost), Arc::new(quality), cache, &config.gateway))
    }

    /// Override the batch poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn cache(&self) -> &GenerationCache {
        &self.cache
    }

    /// Provider calls made so far, batch submissions and polls included
    pub fn provider_calls(&self) -> u64 {
        self.provider_calls.load(Ordering::Relaxed)
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Cost => &self.cost_model,
            ModelTier::Quality => &self.quality_model,
        }
    }

    /// The descriptor a prompt is cached under at a tier
    pub fn request_for(&self, tier: ModelTier, prompt: &str) -> GenerationRequest {
        let request = GenerationRequest::new(self.model_for(tier), prompt);
        match self.temperature {
            Some(temperature) => request.with_temperature(temperature),
            None => request,
        }
    }

    fn provider_for(&self, tier: ModelTier) -> &Arc<dyn TextProvider> {
        match tier {
            ModelTier::Cost => &self.cost,
            ModelTier::Quality => &self.quality,
        }
    }

    fn count_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }
}

/// Reject prompts that still carry a template placeholder
fn check_prompt(prompt: &str) -> Result<()> {
    let leftover = unresolved_placeholders(prompt);
    if leftover.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::invalid_prompt(format!(
            "Prompt contains unresolved placeholders: {}",
            leftover.join(", ")
        )))
    }
}

/// Provider faults worth another attempt
fn is_transient(error: &GatewayError) -> bool {
    matches!(error, GatewayError::Provider(e) if e.is_retryable())
}

/// Server-suggested wait, used as a floor on the backoff
fn retry_hint(error: &GatewayError) -> Option<Duration> {
    match error {
        GatewayError::Provider(e) => e.retry_after().map(Duration::from_secs),
        _ => None,
    }
}

/// A prompt the model cannot accept becomes a cached empty result
fn is_context_length(error: &GatewayError) -> bool {
    matches!(error, GatewayError::Provider(e) if e.is_context_length_exceeded())
}
