//! Configuration validation

use super::models::*;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        match &self.backend {
            CacheBackend::Gcs { bucket } if bucket.trim().is_empty() => {
                Err("cache.backend.bucket must not be empty".to_string())
            }
            CacheBackend::Local { path } if path.as_os_str().is_empty() => {
                Err("cache.backend.path must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cost_model.trim().is_empty() || self.quality_model.trim().is_empty() {
            return Err("gateway.cost_model and gateway.quality_model are required".to_string());
        }
        if self.admission_limit == 0 {
            return Err("gateway.admission_limit must be at least 1".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("gateway.max_output_tokens must be positive".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("gateway.retry.max_attempts must be at least 1".to_string());
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err("gateway.retry.base_delay_ms exceeds max_delay_ms".to_string());
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!("gateway.temperature {} is out of range", temperature));
            }
        }
        Ok(())
    }
}

impl Validate for SummarizationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_token_ceiling == 0 {
            return Err("summarization.output_token_ceiling must be positive".to_string());
        }
        if self.token_budget < self.output_token_ceiling.saturating_mul(2) {
            return Err(
                "summarization.token_budget must allow at least one batch".to_string(),
            );
        }
        Ok(())
    }
}
