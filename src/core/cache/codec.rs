//! Value encoding: serialize, then LZMA-compress

use crate::utils::error::{GatewayError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

const XZ_PRESET: u32 = 6;

/// How cached values are serialized before compression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    #[default]
    Json,
    Binary,
}

impl CacheMode {
    /// File name of the payload object inside a key's directory
    pub fn data_file(&self) -> &'static str {
        match self {
            Self::Json => "data.json.xz",
            Self::Binary => "data.bincode.xz",
        }
    }
}

pub fn encode<T: Serialize + ?Sized>(mode: CacheMode, value: &T) -> Result<Vec<u8>> {
    let raw = match mode {
        CacheMode::Json => serde_json::to_vec(value)?,
        CacheMode::Binary => bincode::serialize(value)
            .map_err(|e| GatewayError::cache(format!("Binary encoding failed: {}", e)))?,
    };

    let mut encoder = XzEncoder::new(Vec::with_capacity(raw.len() / 2), XZ_PRESET);
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

pub fn decode<T: DeserializeOwned>(mode: CacheMode, bytes: &[u8]) -> Result<T> {
    let mut raw = Vec::new();
    XzDecoder::new(bytes)
        .read_to_end(&mut raw)
        .map_err(|e| GatewayError::cache(format!("Decompression failed: {}", e)))?;

    match mode {
        CacheMode::Json => serde_json::from_slice(&raw)
            .map_err(|e| GatewayError::cache(format!("JSON decoding failed: {}", e))),
        CacheMode::Binary => bincode::deserialize(&raw)
            .map_err(|e| GatewayError::cache(format!("Binary decoding failed: {}", e))),
    }
}
