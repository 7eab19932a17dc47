//! Anthropic provider (quality tier)

pub mod client;
pub mod config;
pub mod error;

pub use client::AnthropicClient;
pub use config::AnthropicConfig;
pub use error::AnthropicErrorMapper;
