//! Gemini batch jobs (`batchGenerateContent`)
//!
//! Requests are sent inline, each tagged with `metadata.key`. The job is a
//! long-running operation named `batches/{id}`; once it has ended the inline
//! responses carry the same metadata back.

use serde_json::{Value, json};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::client::{GeminiClient, PROVIDER};
use super::error::GeminiErrorMapper;
use crate::core::providers::error::ProviderError;
use crate::core::providers::types::{BatchItem, BatchItemResult, BatchJob, BatchState};

/// Where inline responses may sit in a batch resource
const INLINED_RESPONSE_POINTERS: &[&str] = &[
    "/response/inlinedResponses/inlinedResponses",
    "/response/inlinedResponses",
    "/metadata/output/inlinedResponses/inlinedResponses",
    "/output/inlinedResponses/inlinedResponses",
    "/dest/inlinedResponses",
];

impl GeminiClient {
    pub(super) async fn create_batch_job(
        &self,
        model: &str,
        items: &[BatchItem],
        max_output_tokens: u32,
    ) -> Result<BatchJob, ProviderError> {
        if items.is_empty() {
            return Err(ProviderError::invalid_request(PROVIDER, "Batch job has no requests"));
        }

        let requests: Vec<Value> = items
            .iter()
            .map(|item| {
                json!({
                    "request": Self::transform_request(&item.request, max_output_tokens),
                    "metadata": {"key": item.key},
                })
            })
            .collect();

        let body = json!({
            "batch": {
                "display_name": format!("repsheet-{}", Uuid::new_v4()),
                "input_config": {"requests": {"requests": requests}},
            }
        });

        let url = self.config.model_endpoint(model, "batchGenerateContent");
        let response = self.post(&url, &body).await?;
        let job = parse_batch_job(&response)?;
        info!(
            "Submitted Gemini batch job {} with {} requests",
            job.name,
            items.len()
        );
        Ok(job)
    }

    pub(super) async fn get_batch_job(&self, job_name: &str) -> Result<(BatchJob, Value), ProviderError> {
        let url = self.config.resource_endpoint(job_name);
        let response = self.get(&url).await?;
        let job = parse_batch_job(&response)?;
        debug!("Gemini batch job {} is {}", job.name, job.state);
        Ok((job, response))
    }

    pub(super) async fn collect_batch_results(
        &self,
        job_name: &str,
    ) -> Result<Vec<BatchItemResult>, ProviderError> {
        let (job, response) = self.get_batch_job(job_name).await?;
        match job.state {
            BatchState::Succeeded => parse_batch_results(&response),
            state if state.is_terminal() => {
                Err(ProviderError::batch_failed(PROVIDER, job.name, state.to_string()))
            }
            state => Err(ProviderError::invalid_request(
                PROVIDER,
                format!("Batch job {} has not finished ({})", job.name, state),
            )),
        }
    }
}

fn parse_state(raw: &str) -> BatchState {
    let state = raw
        .trim_start_matches("BATCH_STATE_")
        .trim_start_matches("JOB_STATE_");
    match state {
        "PENDING" | "QUEUED" => BatchState::Pending,
        "RUNNING" => BatchState::Running,
        // Per-request failures come back as errored units
        "SUCCEEDED" | "PARTIALLY_SUCCEEDED" => BatchState::Succeeded,
        "FAILED" => BatchState::Failed,
        "CANCELLED" => BatchState::Cancelled,
        "EXPIRED" => BatchState::Expired,
        _ => BatchState::Unknown(raw.to_string()),
    }
}

/// Read the job name and state from an operation or batch resource
pub fn parse_batch_job(response: &Value) -> Result<BatchJob, ProviderError> {
    let name = response
        .get("name")
        .or_else(|| response.pointer("/metadata/name"))
        .and_then(|n| n.as_str())
        .ok_or_else(|| ProviderError::response_parsing(PROVIDER, "Batch job has no name"))?
        .to_string();

    let raw_state = response
        .pointer("/metadata/state")
        .or_else(|| response.get("state"))
        .and_then(|s| s.as_str());

    let state = match raw_state {
        Some(raw) => parse_state(raw),
        None if response.get("done").and_then(|d| d.as_bool()) == Some(true) => {
            if response.get("error").is_some() {
                BatchState::Failed
            } else {
                BatchState::Succeeded
            }
        }
        None => BatchState::Pending,
    };

    Ok(BatchJob { name, state })
}

/// Per-request outcomes of a finished job, keyed by `metadata.key`
pub fn parse_batch_results(response: &Value) -> Result<Vec<BatchItemResult>, ProviderError> {
    let entries = INLINED_RESPONSE_POINTERS
        .iter()
        .find_map(|pointer| response.pointer(pointer).and_then(|v| v.as_array()))
        .ok_or_else(|| ProviderError::response_parsing(PROVIDER, "Batch job has no inline responses"))?;

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(key) = entry.pointer("/metadata/key").and_then(|k| k.as_str()) else {
            warn!("Skipping Gemini batch response without a key");
            continue;
        };

        let outcome = match (entry.get("response"), entry.get("error")) {
            (_, Some(error)) => Err(GeminiErrorMapper::from_status_object(error)),
            (Some(response), None) => GeminiClient::transform_response(response),
            (None, None) => Ok(None),
        };
        results.push(BatchItemResult {
            key: key.to_string(),
            outcome,
        });
    }
    Ok(results)
}
