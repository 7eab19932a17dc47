//! Synchronous request mode

use super::{Gateway, GenerateOptions, check_prompt, is_context_length, is_transient, retry_hint};
use crate::core::cache::CacheKey;
use crate::core::types::{GenerationRequest, ModelTier};
use crate::utils::error::{GatewayError, Result};
use tracing::{debug, warn};

impl Gateway {
    /// Generate text for one prompt at a tier.
    ///
    /// `Ok(None)` is a defined empty result, e.g. a prompt longer than the
    /// model accepts. It is cached like any other answer.
    pub async fn generate_text(
        &self,
        prompt: &str,
        tier: ModelTier,
        options: GenerateOptions,
    ) -> Result<Option<String>> {
        check_prompt(prompt)?;
        let request = self.request_for(tier, prompt);
        let key = CacheKey::structured(&request)?;

        if !options.invalidate_cache {
            if let Some(cached) = self.cached(&key).await? {
                return Ok(cached);
            }
        }

        let max_output_tokens = options.max_output_tokens.unwrap_or(self.max_output_tokens);
        let text = self.call_provider(tier, &request, max_output_tokens).await?;
        self.cache.set(&key, &text).await?;
        Ok(text)
    }

    /// A cached answer, `Some(None)` for a cached empty result
    pub(super) async fn cached(&self, key: &CacheKey) -> Result<Option<Option<String>>> {
        if !self.cache.has(key).await? {
            return Ok(None);
        }
        let cached = self.cache.get::<Option<String>>(key).await?;
        if cached.is_some() {
            debug!("Serving generation from cache");
        }
        Ok(cached)
    }

    /// One provider call under the admission limit and retry policy
    pub(super) async fn call_provider(
        &self,
        tier: ModelTier,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> Result<Option<String>> {
        let provider = self.provider_for(tier);
        let result = self
            .retry
            .call_with_hint(
                move || async move {
                    let _permit = self.admission.acquire().await?;
                    self.count_call();
                    provider
                        .generate(request, max_output_tokens)
                        .await
                        .map_err(GatewayError::from)
                },
                is_transient,
                retry_hint,
            )
            .await;

        match result {
            Ok(text) => Ok(text),
            Err(e) if is_context_length(&e) => {
                warn!(
                    "Prompt too long for {} ({}), recording empty result: {}",
                    request.model, tier, e
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
