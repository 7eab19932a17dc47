//! Common test utilities for repsheet-genai
//!
//! - Scripted providers that answer from a closure and count calls
//! - Voting record factories and inline prompt templates
//! - A pipeline wired over scripted providers and an in-memory cache

pub mod fixtures;
pub mod providers;

pub use fixtures::{VotingRecordFactory, test_prompts};
pub use providers::ScriptedProvider;

use repsheet_genai::config::{AppConfig, GatewayConfig, RetrySettings};
use repsheet_genai::{CorrectionTable, DiagnosticSink, Gateway, GenerationCache, Pipeline};
use std::sync::Arc;
use std::time::Duration;

/// Gateway settings with millisecond retries
pub fn fast_gateway_config() -> GatewayConfig {
    GatewayConfig {
        retry: RetrySettings {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter: false,
        },
        ..Default::default()
    }
}

/// Gateway over two scripted tiers
pub fn test_gateway(
    cost: Arc<ScriptedProvider>,
    quality: Arc<ScriptedProvider>,
    cache: GenerationCache,
) -> Gateway {
    Gateway::new(cost, quality, cache, &fast_gateway_config()).with_poll_interval(Duration::from_millis(1))
}

/// Pipeline with default batching (23 batches per member)
pub fn test_pipeline(gateway: Gateway, diagnostics: DiagnosticSink) -> Pipeline {
    let config = AppConfig {
        gateway: fast_gateway_config(),
        ..Default::default()
    };
    Pipeline::new(
        Arc::new(gateway),
        Arc::new(test_prompts()),
        Arc::new(CorrectionTable::default()),
        diagnostics,
        &config,
    )
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
