//! Scripted text providers
//!
//! In-process providers that answer from a closure, record every request and
//! optionally run batch jobs, so pipeline tests need no network.

use async_trait::async_trait;
use parking_lot::Mutex;
use repsheet_genai::core::providers::{BatchItem, BatchItemResult, BatchJob, BatchState};
use repsheet_genai::{GenerationRequest, ProviderError, TextProvider};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type Responder =
    Arc<dyn Fn(&GenerationRequest) -> Result<Option<String>, ProviderError> + Send + Sync>;

/// A provider that answers every request with `responder`
pub struct ScriptedProvider {
    name: &'static str,
    responder: Responder,
    batch_capable: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
    jobs: Mutex<HashMap<String, Vec<BatchItem>>>,
    batch_states: Mutex<VecDeque<BatchState>>,
    batches: AtomicUsize,
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("name", &self.name)
            .field("calls", &self.calls())
            .finish()
    }
}

impl ScriptedProvider {
    pub fn new<F>(name: &'static str, responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<Option<String>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            name,
            responder: Arc::new(responder),
            batch_capable: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            jobs: Mutex::new(HashMap::new()),
            batch_states: Mutex::new(VecDeque::new()),
            batches: AtomicUsize::new(0),
        }
    }

    /// Accept batch jobs; each job reports `states` in turn before succeeding
    pub fn with_batch_support(mut self, states: Vec<BatchState>) -> Self {
        self.batch_capable = true;
        self.batch_states = Mutex::new(states.into());
        self
    }

    /// Synchronous generate calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Batch jobs submitted so far
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    /// Prompts of every synchronous request, in arrival order
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.prompt.clone()).collect()
    }

    /// Register a job as if a previous process had submitted it
    pub fn insert_job(&self, name: &str, items: Vec<BatchItem>) {
        self.jobs.lock().insert(name.to_string(), items);
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _max_output_tokens: u32,
    ) -> Result<Option<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        (self.responder)(request)
    }

    fn supports_batch(&self) -> bool {
        self.batch_capable
    }

    async fn submit_batch(
        &self,
        _model: &str,
        items: &[BatchItem],
        _max_output_tokens: u32,
    ) -> Result<BatchJob, ProviderError> {
        let id = self.batches.fetch_add(1, Ordering::SeqCst);
        let name = format!("batches/{}", id);
        self.jobs.lock().insert(name.clone(), items.to_vec());
        Ok(BatchJob {
            name,
            state: BatchState::Pending,
        })
    }

    async fn poll_batch(&self, job_name: &str) -> Result<BatchJob, ProviderError> {
        if !self.jobs.lock().contains_key(job_name) {
            return Err(ProviderError::invalid_request(self.name, format!("no job {}", job_name)));
        }
        let state = self
            .batch_states
            .lock()
            .pop_front()
            .unwrap_or(BatchState::Succeeded);
        Ok(BatchJob {
            name: job_name.to_string(),
            state,
        })
    }

    async fn batch_results(&self, job_name: &str) -> Result<Vec<BatchItemResult>, ProviderError> {
        let items = self
            .jobs
            .lock()
            .get(job_name)
            .cloned()
            .ok_or_else(|| ProviderError::invalid_request(self.name, format!("no job {}", job_name)))?;
        Ok(items
            .into_iter()
            .map(|item| BatchItemResult {
                outcome: (self.responder)(&item.request),
                key: item.key,
            })
            .collect())
    }
}
