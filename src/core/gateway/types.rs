//! Gateway option and result types

use serde::Serialize;

/// Per-call options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Skip the cache read; the fresh result is still written
    pub invalidate_cache: bool,
    /// Override the configured output token ceiling
    pub max_output_tokens: Option<u32>,
}

impl GenerateOptions {
    pub fn invalidated() -> Self {
        Self {
            invalidate_cache: true,
            ..Default::default()
        }
    }

    pub fn with_invalidate_cache(mut self, invalidate_cache: bool) -> Self {
        self.invalidate_cache = invalidate_cache;
        self
    }
}

/// What collecting a finished batch job wrote to the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchCollection {
    pub job: String,
    /// Keys written, empty results included
    pub stored: Vec<String>,
    /// Keys whose unit errored and were left uncached
    pub errored: Vec<String>,
}
