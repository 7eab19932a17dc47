//! Provider configuration

use crate::core::providers::{AnthropicConfig, GeminiConfig};
use serde::{Deserialize, Serialize};

/// Connection settings for both provider tiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: GeminiConfig,
    pub anthropic: AnthropicConfig,
}

impl ProvidersConfig {
    /// Fill missing API keys from `GEMINI_API_KEY` / `ANTHROPIC_API_KEY`
    pub fn with_env_fallback(self) -> Self {
        Self {
            gemini: self.gemini.with_env_fallback(),
            anthropic: self.anthropic.with_env_fallback(),
        }
    }
}
