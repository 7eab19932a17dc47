//! Error types for the summarization pipeline

use crate::core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Object storage errors other than "not found"
    #[error("Cache storage error: {0}")]
    Storage(#[from] object_store::Error),

    /// Cache encoding errors (compression, binary codec)
    #[error("Cache error: {0}")]
    Cache(String),

    /// Provider errors that survived the retry policy
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A prompt still contains a template placeholder
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// The gateway was asked for something it does not offer
    #[error("Gateway misuse: {0}")]
    Usage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
