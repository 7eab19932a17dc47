//! Admission control for outbound provider calls

use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Bulkhead bounding the number of concurrent outstanding provider calls.
///
/// Shared by every tier and by both the synchronous and batch submission
/// paths; callers beyond the limit suspend until a slot frees.
#[derive(Debug, Clone)]
pub struct Bulkhead {
    semaphore: Arc<Semaphore>,
    name: String,
    max_concurrent: usize,
}

impl Bulkhead {
    /// Create a new bulkhead
    pub fn new(name: impl Into<String>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            name: name.into(),
            max_concurrent,
        }
    }

    /// Wait for a slot. The slot is released when the permit is dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| GatewayError::internal(format!("Bulkhead acquire failed: {}", e)))?;
        debug!("Bulkhead '{}' acquired permit", self.name);
        Ok(permit)
    }

    /// Execute a future while holding a slot
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: std::future::Future<Output = R>,
    {
        let _permit = self.acquire().await?;
        let result = f.await;
        debug!("Bulkhead '{}' released permit", self.name);
        Ok(result)
    }

    /// Get available permits
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get maximum concurrent operations
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
