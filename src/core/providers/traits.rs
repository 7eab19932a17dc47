//! The capability every text-generation provider offers

use super::error::ProviderError;
use super::types::{BatchItem, BatchItemResult, BatchJob};
use crate::core::types::GenerationRequest;
use async_trait::async_trait;

/// Generate text for a prompt under a named model.
///
/// `Ok(None)` is a defined empty result: the provider answered but produced
/// no usable text. A prompt the model cannot accept is reported as
/// [`ProviderError::ContextLengthExceeded`] and left to the caller to map.
#[async_trait]
pub trait TextProvider: Send + Sync + std::fmt::Debug {
    /// Provider name used in logs and errors
    fn name(&self) -> &'static str;

    /// Synchronous request mode
    async fn generate(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> Result<Option<String>, ProviderError>;

    /// Whether [`Self::submit_batch`] is available
    fn supports_batch(&self) -> bool {
        false
    }

    /// Submit many requests as one provider-side job
    async fn submit_batch(
        &self,
        model: &str,
        items: &[BatchItem],
        max_output_tokens: u32,
    ) -> Result<BatchJob, ProviderError> {
        let _ = (model, items, max_output_tokens);
        Err(ProviderError::not_supported(self.name(), "batch jobs"))
    }

    /// Current state of a submitted job
    async fn poll_batch(&self, job_name: &str) -> Result<BatchJob, ProviderError> {
        let _ = job_name;
        Err(ProviderError::not_supported(self.name(), "batch jobs"))
    }

    /// Per-unit results of a job that has ended
    async fn batch_results(&self, job_name: &str) -> Result<Vec<BatchItemResult>, ProviderError> {
        let _ = job_name;
        Err(ProviderError::not_supported(self.name(), "batch jobs"))
    }
}
