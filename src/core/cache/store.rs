//! Generation cache over a durable object store

use super::backend::build_store;
use super::codec::{self, CacheMode};
use super::key::{CacheKey, ResolvedKey};
use crate::config::CacheConfig;
use crate::utils::error::Result;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

const DESCRIPTOR_FILE: &str = "key.json";

/// Lock-free counters for cache traffic
#[derive(Debug, Default)]
struct AtomicCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    failed_writes: AtomicU64,
}

/// Point-in-time copy of the cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub failed_writes: u64,
}

/// Content-addressed cache of generation results.
///
/// Each entry lives under `{prefix}{key}/`: the compressed value in
/// `data.json.xz` (or `data.bincode.xz`) and, for descriptor-derived keys,
/// the canonical descriptor in `key.json`. A missing value object is a miss;
/// a stored `null` is a hit.
#[derive(Clone)]
pub struct GenerationCache {
    store: Arc<dyn ObjectStore>,
    key_prefix: String,
    mode: CacheMode,
    pending: Arc<Mutex<JoinSet<()>>>,
    stats: Arc<AtomicCacheStats>,
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache")
            .field("store", &self.store.to_string())
            .field("key_prefix", &self.key_prefix)
            .field("mode", &self.mode)
            .finish()
    }
}

impl GenerationCache {
    /// Create
    pub fn new(store: Arc<dyn ObjectStore>, key_prefix: impl Into<String>, mode: CacheMode) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            mode,
            pending: Arc::new(Mutex::new(JoinSet::new())),
            stats: Arc::new(AtomicCacheStats::default()),
        }
    }

    /// Cache backed by process memory, for tests and dry runs
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(object_store::memory::InMemory::new()),
            "",
            CacheMode::Json,
        )
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let store = build_store(config)?;
        Ok(Self::new(store, config.key_prefix.clone(), config.mode))
    }

    /// Check that the backing store answers before a run starts.
    ///
    /// Pulls at most one listing entry, so the cost does not grow with the
    /// cache.
    pub async fn init(&self) -> Result<()> {
        let prefix = self.prefix_path();
        let first = self.store.list(prefix.as_ref()).next().await.transpose()?;
        info!(
            "Generation cache reachable ({}, {})",
            self.store,
            if first.is_some() { "populated" } else { "empty" }
        );
        Ok(())
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            writes: self.stats.writes.load(Ordering::Relaxed),
            failed_writes: self.stats.failed_writes.load(Ordering::Relaxed),
        }
    }

    /// Storage id for a key, without touching the store
    pub fn cache_key(&self, key: &CacheKey) -> Result<String> {
        Ok(key.resolve()?.id)
    }

    /// Existence check on the value object only
    pub async fn has(&self, key: &CacheKey) -> Result<bool> {
        let resolved = key.resolve()?;
        match self.store.head(&self.data_path(&resolved.id)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a value.
    ///
    /// `Ok(None)` means the key was never written. When `T` is itself an
    /// `Option`, a stored null comes back as `Ok(Some(None))`.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let resolved = key.resolve()?;
        let result = match self.store.get(&self.data_path(&resolved.id)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for key: {}", resolved.id);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = result.bytes().await?;
        let value = codec::decode(self.mode, &bytes)?;
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Cache hit for key: {}", resolved.id);
        Ok(Some(value))
    }

    /// Write a value and wait for it to be durable
    pub async fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let resolved = key.resolve()?;
        let data = codec::encode(self.mode, value)?;
        let written = write_entry(
            Arc::clone(&self.store),
            self.data_path(&resolved.id),
            self.descriptor_path(&resolved),
            data,
            resolved.descriptor,
        )
        .await;
        self.record_write(&resolved.id, &written);
        written
    }

    /// Schedule a write without waiting for it.
    ///
    /// The value is encoded up front, so encoding errors still surface here.
    /// Storage errors are logged once the write runs; [`Self::flush`] waits
    /// for everything scheduled so far.
    pub fn set_nowait<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let resolved = key.resolve()?;
        let data = codec::encode(self.mode, value)?;
        let store = Arc::clone(&self.store);
        let data_path = self.data_path(&resolved.id);
        let descriptor_path = self.descriptor_path(&resolved);
        let this = self.clone();

        self.pending.lock().spawn(async move {
            let written =
                write_entry(store, data_path, descriptor_path, data, resolved.descriptor).await;
            this.record_write(&resolved.id, &written);
        });
        Ok(())
    }

    /// Wait for every scheduled write. Returns how many were awaited.
    pub async fn flush(&self) -> usize {
        let mut pending = std::mem::take(&mut *self.pending.lock());
        let mut awaited = 0;
        while let Some(joined) = pending.join_next().await {
            awaited += 1;
            if let Err(e) = joined {
                warn!("Background cache write task failed: {}", e);
            }
        }
        if awaited > 0 {
            debug!("Flushed {} pending cache writes", awaited);
        }
        awaited
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// With `invalidate` set the read is skipped but the fresh value is still
    /// written.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &CacheKey, invalidate: bool, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !invalidate {
            if let Some(value) = self.get::<T>(key).await? {
                return Ok(value);
            }
        }

        let value = compute().await?;
        self.set_nowait(key, &value)?;
        Ok(value)
    }

    fn record_write(&self, id: &str, written: &Result<()>) {
        match written {
            Ok(()) => {
                self.stats.writes.fetch_add(1, Ordering::Relaxed);
                debug!("Cached value for key: {}", id);
            }
            Err(e) => {
                self.stats.failed_writes.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to write cache entry {}: {}", id, e);
            }
        }
    }

    fn prefix_path(&self) -> Option<Path> {
        let trimmed = self.key_prefix.trim_matches('/');
        (!trimmed.is_empty()).then(|| Path::from(trimmed))
    }

    fn entry_dir(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }

    fn data_path(&self, id: &str) -> Path {
        Path::from(format!("{}/{}", self.entry_dir(id), self.mode.data_file()))
    }

    fn descriptor_path(&self, resolved: &ResolvedKey) -> Option<Path> {
        resolved
            .descriptor
            .as_ref()
            .map(|_| Path::from(format!("{}/{}", self.entry_dir(&resolved.id), DESCRIPTOR_FILE)))
    }
}

async fn write_entry(
    store: Arc<dyn ObjectStore>,
    data_path: Path,
    descriptor_path: Option<Path>,
    data: Vec<u8>,
    descriptor: Option<Vec<u8>>,
) -> Result<()> {
    store.put(&data_path, PutPayload::from(data)).await?;
    if let (Some(path), Some(descriptor)) = (descriptor_path, descriptor) {
        store.put(&path, PutPayload::from(descriptor)).await?;
    }
    Ok(())
}
