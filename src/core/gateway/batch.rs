//! Asynchronous batch mode (cost tier only)
//!
//! Each unit travels with its cache key, so results can be slotted into the
//! cache whenever the job ends, even by a later process.

use super::{BatchCollection, Gateway, GenerateOptions, check_prompt, is_transient, retry_hint};
use crate::core::cache::CacheKey;
use crate::core::providers::{BatchItem, BatchItemResult, BatchJob, BatchState, ProviderError};
use crate::core::types::ModelTier;
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

impl Gateway {
    /// Generate text for many prompts through one provider-side batch job.
    ///
    /// Cached prompts are answered without submitting them. Units the job
    /// reports as errored, and every unit of a job that did not succeed, are
    /// retried through the synchronous path. Results come back in prompt
    /// order.
    pub async fn generate_text_batch(
        &self,
        prompts: &[String],
        tier: ModelTier,
        options: GenerateOptions,
    ) -> Result<Vec<Option<String>>> {
        if tier != ModelTier::Cost {
            return Err(GatewayError::usage(format!(
                "batch mode is cost-tier only, not {}",
                tier
            )));
        }
        if !self.cost.supports_batch() {
            return Err(GatewayError::usage(format!(
                "provider {} does not support batch jobs",
                self.cost.name()
            )));
        }
        for prompt in prompts {
            check_prompt(prompt)?;
        }

        let mut keys = Vec::with_capacity(prompts.len());
        let mut answers: HashMap<String, Option<String>> = HashMap::new();
        let mut pending: Vec<BatchItem> = Vec::new();
        let mut descriptors: HashMap<String, CacheKey> = HashMap::new();

        for prompt in prompts {
            let request = self.request_for(tier, prompt);
            let key = CacheKey::structured(&request)?;
            let id = self.cache.cache_key(&key)?;
            keys.push(id.clone());

            if answers.contains_key(&id) || descriptors.contains_key(&id) {
                continue;
            }
            if !options.invalidate_cache {
                if let Some(cached) = self.cached(&key).await? {
                    answers.insert(id, cached);
                    continue;
                }
            }
            descriptors.insert(id.clone(), key);
            pending.push(BatchItem { key: id, request });
        }

        if !pending.is_empty() {
            info!(
                "Submitting {} of {} prompts as a batch job ({} served from cache)",
                pending.len(),
                prompts.len(),
                prompts.len() - pending.len()
            );
            let max_output_tokens = options.max_output_tokens.unwrap_or(self.max_output_tokens);
            let job = self.submit_batch(&pending, max_output_tokens).await?;
            let job = self.wait_for_batch(job).await?;

            if job.state == BatchState::Succeeded {
                let results = self.batch_results(&job.name).await?;
                let (_, stored) = self.store_batch_results(&job.name, results, &descriptors).await?;
                answers.extend(stored);
            } else {
                warn!(
                    "Batch job {} ended {}, falling back to synchronous requests",
                    job.name, job.state
                );
            }

            for item in &pending {
                if answers.contains_key(&item.key) {
                    continue;
                }
                debug!("Generating unit {} synchronously", item.key);
                let text = self
                    .generate_text(&item.request.prompt, tier, options.with_invalidate_cache(true))
                    .await?;
                answers.insert(item.key.clone(), text);
            }
        }

        Ok(keys
            .iter()
            .map(|id| answers.get(id).cloned().flatten())
            .collect())
    }

    /// Fetch the results of a previously submitted job and write them to the
    /// cache under their unit keys.
    ///
    /// Fails with a usage error while the job is still running.
    pub async fn collect_batch_job(&self, job_name: &str) -> Result<BatchCollection> {
        let job = self.poll_batch(job_name).await?;
        if !job.state.is_terminal() {
            return Err(GatewayError::usage(format!(
                "batch job {} has not finished ({})",
                job.name, job.state
            )));
        }
        if job.state != BatchState::Succeeded {
            return Err(ProviderError::batch_failed(
                self.cost.name(),
                job.name,
                job.state.to_string(),
            )
            .into());
        }

        let results = self.batch_results(&job.name).await?;
        let (collection, _) = self
            .store_batch_results(&job.name, results, &HashMap::new())
            .await?;
        Ok(collection)
    }

    async fn submit_batch(&self, items: &[BatchItem], max_output_tokens: u32) -> Result<BatchJob> {
        let model = self.model_for(ModelTier::Cost);
        self.retry
            .call_with_hint(
                move || async move {
                    // Submission is one throttled call
                    let _permit = self.admission.acquire().await?;
                    self.count_call();
                    self.cost
                        .submit_batch(model, items, max_output_tokens)
                        .await
                        .map_err(GatewayError::from)
                },
                is_transient,
                retry_hint,
            )
            .await
    }

    async fn poll_batch(&self, job_name: &str) -> Result<BatchJob> {
        self.retry
            .call_with_hint(
                move || async move {
                    self.count_call();
                    self.cost.poll_batch(job_name).await.map_err(GatewayError::from)
                },
                is_transient,
                retry_hint,
            )
            .await
    }

    async fn batch_results(&self, job_name: &str) -> Result<Vec<BatchItemResult>> {
        self.retry
            .call_with_hint(
                move || async move {
                    self.count_call();
                    self.cost.batch_results(job_name).await.map_err(GatewayError::from)
                },
                is_transient,
                retry_hint,
            )
            .await
    }

    /// Poll until the provider reports the job ended. Holds no admission slot.
    async fn wait_for_batch(&self, mut job: BatchJob) -> Result<BatchJob> {
        while !job.state.is_terminal() {
            debug!("Batch job {} is {}, polling again", job.name, job.state);
            tokio::time::sleep(self.poll_interval).await;
            job = self.poll_batch(&job.name).await?;
        }
        info!("Batch job {} ended {}", job.name, job.state);
        Ok(job)
    }

    /// Write unit results to the cache; errored units are left uncached.
    ///
    /// `descriptors` supplies structured keys so the descriptor is written
    /// alongside; units without one are stored under their literal key.
    async fn store_batch_results(
        &self,
        job_name: &str,
        results: Vec<BatchItemResult>,
        descriptors: &HashMap<String, CacheKey>,
    ) -> Result<(BatchCollection, HashMap<String, Option<String>>)> {
        let mut stored = HashMap::with_capacity(results.len());
        let mut collection = BatchCollection {
            job: job_name.to_string(),
            ..Default::default()
        };

        for result in results {
            let text = match result.outcome {
                Ok(text) => text,
                Err(e) if e.is_context_length_exceeded() => {
                    warn!("Batch unit {} exceeded the context length, recording empty result", result.key);
                    None
                }
                Err(e) => {
                    warn!("Batch unit {} failed: {}", result.key, e);
                    collection.errored.push(result.key);
                    continue;
                }
            };

            let key = descriptors
                .get(&result.key)
                .cloned()
                .unwrap_or_else(|| CacheKey::literal(result.key.clone()));
            self.cache.set(&key, &text).await?;
            collection.stored.push(result.key.clone());
            stored.insert(result.key, text);
        }

        info!(
            "Collected batch job {}: {} stored, {} errored",
            job_name,
            collection.stored.len(),
            collection.errored.len()
        );
        Ok((collection, stored))
    }
}
