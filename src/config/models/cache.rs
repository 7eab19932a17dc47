//! Cache configuration

use crate::core::cache::CacheMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where cache entries are stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process memory, lost on exit
    Memory,
    /// A directory on the local filesystem
    Local { path: PathBuf },
    /// A Google Cloud Storage bucket; credentials come from the environment
    Gcs { bucket: String },
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from(".cache/repsheet"),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Prepended verbatim to every key; include a trailing `/` for a folder
    pub key_prefix: String,
    pub mode: CacheMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            key_prefix: "genai-cache/".to_string(),
            mode: CacheMode::Json,
        }
    }
}
