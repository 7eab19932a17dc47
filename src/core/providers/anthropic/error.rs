//! Anthropic Error Handling

use crate::core::providers::error::{ProviderError, error_message, extract_retry_after};

const PROVIDER: &str = "anthropic";

/// Error
pub struct AnthropicErrorMapper;

impl AnthropicErrorMapper {
    /// Map a non-success HTTP response
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        let message = error_message(body);
        match status {
            400 if Self::is_prompt_too_long(&message) => {
                ProviderError::context_length_exceeded(PROVIDER, message)
            }
            400 => ProviderError::invalid_request(PROVIDER, format!("Bad request: {}", message)),
            401 => ProviderError::authentication(PROVIDER, "Invalid or missing API key"),
            403 => ProviderError::authentication(PROVIDER, "Forbidden: insufficient permissions"),
            404 => ProviderError::invalid_request(PROVIDER, format!("Model or endpoint not found: {}", message)),
            408 => ProviderError::timeout(PROVIDER, message),
            429 => ProviderError::rate_limit(PROVIDER, extract_retry_after(body)),
            529 => ProviderError::provider_unavailable(PROVIDER, "Service overloaded"),
            500..=599 => ProviderError::provider_unavailable(PROVIDER, format!("Server error: {}", message)),
            _ => ProviderError::api_error(PROVIDER, status, message),
        }
    }

    fn is_prompt_too_long(message: &str) -> bool {
        let message = message.to_ascii_lowercase();
        message.contains("prompt is too long") || message.contains("context window")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_too_long_is_context_length() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"prompt is too long: 215000 tokens > 200000 maximum"}}"#;
        let error = AnthropicErrorMapper::from_http_status(400, body);
        assert!(error.is_context_length_exceeded());
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_overloaded_is_retryable() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let error = AnthropicErrorMapper::from_http_status(529, body);
        assert!(matches!(error, ProviderError::ProviderUnavailable { .. }));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_rate_limit_keeps_retry_hint() {
        let error = AnthropicErrorMapper::from_http_status(429, r#"{"error":{"retry_after":12}}"#);
        assert_eq!(error.retry_after(), Some(12));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_plain_bad_request_is_permanent() {
        let error = AnthropicErrorMapper::from_http_status(400, "max_tokens: must be positive");
        match error {
            ProviderError::InvalidRequest { provider, message } => {
                assert_eq!(provider, "anthropic");
                assert!(message.contains("max_tokens"));
            }
            _ => panic!("Expected invalid request error"),
        }
    }
}
