//! Gateway configuration

use super::*;
use crate::utils::error::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry settings for transient provider faults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_retries(),
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
            jitter: true,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            jitter: settings.jitter,
            ..Default::default()
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Model served by the cost tier
    pub cost_model: String,
    /// Model served by the quality tier
    pub quality_model: String,
    /// Output token ceiling passed with every request
    pub max_output_tokens: u32,
    /// Sampling temperature; part of the cache key when set
    pub temperature: Option<f64>,
    /// Concurrent outstanding provider calls, both tiers combined
    pub admission_limit: usize,
    /// Seconds between batch job polls
    pub batch_poll_interval_secs: u64,
    pub retry: RetrySettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cost_model: "gemini-2.0-flash".to_string(),
            quality_model: "claude-3-7-sonnet-latest".to_string(),
            max_output_tokens: default_output_token_ceiling(),
            temperature: None,
            admission_limit: 8,
            batch_poll_interval_secs: 30,
            retry: RetrySettings::default(),
        }
    }
}

impl GatewayConfig {
    pub fn batch_poll_interval(&self) -> Duration {
        Duration::from_secs(self.batch_poll_interval_secs)
    }
}
