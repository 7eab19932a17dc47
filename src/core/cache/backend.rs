//! Durable object store backends for the generation cache

use crate::config::{CacheBackend, CacheConfig};
use crate::utils::error::{GatewayError, Result};
use object_store::ObjectStore;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use std::sync::Arc;
use tracing::info;

/// Build the object store named by the cache configuration
pub fn build_store(config: &CacheConfig) -> Result<Arc<dyn ObjectStore>> {
    match &config.backend {
        CacheBackend::Memory => {
            info!("Using in-memory generation cache");
            Ok(Arc::new(InMemory::new()))
        }
        CacheBackend::Local { path } => {
            std::fs::create_dir_all(path)?;
            info!("Using local generation cache at {}", path.display());
            Ok(Arc::new(LocalFileSystem::new_with_prefix(path)?))
        }
        CacheBackend::Gcs { bucket } => {
            if bucket.is_empty() {
                return Err(GatewayError::config("GCS cache backend requires a bucket"));
            }
            info!("Using GCS generation cache in bucket {}", bucket);
            let store = GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket)
                .build()?;
            Ok(Arc::new(store))
        }
    }
}
