//! Content-addressed cache keys

use crate::core::types::canonical::{sort_keys, to_canonical_bytes};
use crate::utils::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::Value;

/// Derive the cache key for a structured descriptor.
///
/// Returns the 22-character URL-safe digest together with the canonical
/// (compact, key-sorted) JSON it was computed from. Descriptors that are
/// equal after key-sorting always produce the same key.
pub fn derive_key<T: Serialize + ?Sized>(descriptor: &T) -> Result<(String, Vec<u8>)> {
    let canonical = to_canonical_bytes(descriptor)?;
    let digest = Md5::digest(&canonical);
    Ok((URL_SAFE_NO_PAD.encode(digest), canonical))
}

/// Either a ready-made key string or a descriptor to derive one from
#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey {
    /// Used verbatim
    Literal(String),
    /// Hashed with [`derive_key`]; the descriptor is stored next to the value
    Structured(Value),
}

impl CacheKey {
    pub fn literal(key: impl Into<String>) -> Self {
        Self::Literal(key.into())
    }

    pub fn structured<T: Serialize + ?Sized>(descriptor: &T) -> Result<Self> {
        Ok(Self::Structured(sort_keys(serde_json::to_value(descriptor)?)))
    }

    /// Compute the storage id and, for structured keys, the descriptor bytes
    pub fn resolve(&self) -> Result<ResolvedKey> {
        match self {
            Self::Literal(id) => Ok(ResolvedKey {
                id: id.clone(),
                descriptor: None,
            }),
            Self::Structured(descriptor) => {
                let (id, canonical) = derive_key(descriptor)?;
                Ok(ResolvedKey {
                    id,
                    descriptor: Some(canonical),
                })
            }
        }
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::Literal(key.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self::Literal(key)
    }
}

/// A key ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub id: String,
    pub descriptor: Option<Vec<u8>>,
}
