//! Generation requests and model tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// The structured descriptor of one text generation.
///
/// Field names are part of the cache key, so they must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub method: String,
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl GenerationRequest {
    pub const METHOD: &'static str = "generate_text";

    /// Create
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            method: Self::METHOD.to_string(),
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Which class of model serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap, high throughput, batch capable
    Cost,
    /// Expensive, used for merges and escalations
    Quality,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cost => write!(f, "cost"),
            Self::Quality => write!(f, "quality"),
        }
    }
}
