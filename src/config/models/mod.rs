//! Configuration data models

pub mod cache;
pub mod gateway;
pub mod logging;
pub mod provider;
pub mod summarization;

pub use cache::*;
pub use gateway::*;
pub use logging::*;
pub use provider::*;
pub use summarization::*;

/// Default maximum attempts for provider calls
pub fn default_max_retries() -> u32 {
    10
}

/// Default output tokens per model call
pub fn default_output_token_ceiling() -> u32 {
    8192
}
