//! Gemini provider (cost tier, batch capable)

pub mod batch;
pub mod client;
pub mod config;
pub mod error;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiErrorMapper;
