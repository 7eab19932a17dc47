//! Text-generation providers
//!
//! Two tiers sit behind [`TextProvider`]: Gemini as the cost tier (the only
//! one with batch jobs) and Anthropic as the quality tier.

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod shared;
pub mod traits;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use error::ProviderError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use traits::TextProvider;
pub use types::{BatchItem, BatchItemResult, BatchJob, BatchState};
