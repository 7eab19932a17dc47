//! Gemini Error Handling

use serde_json::Value;

use crate::core::providers::error::{ProviderError, error_message};

const PROVIDER: &str = "gemini";

/// Error
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Map a non-success HTTP response
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        let message = error_message(body);
        match status {
            400 if Self::is_input_too_long(&message) => {
                ProviderError::context_length_exceeded(PROVIDER, message)
            }
            400 => ProviderError::invalid_request(PROVIDER, format!("Bad request: {}", message)),
            401 | 403 => ProviderError::authentication(PROVIDER, message),
            404 => ProviderError::invalid_request(PROVIDER, format!("Model or endpoint not found: {}", message)),
            408 | 504 => ProviderError::timeout(PROVIDER, message),
            429 => ProviderError::rate_limit(PROVIDER, Self::extract_retry_after(body)),
            500..=599 => ProviderError::provider_unavailable(PROVIDER, format!("Server error: {}", message)),
            _ => ProviderError::api_error(PROVIDER, status, message),
        }
    }

    /// Map an inline `error` status object, as found in batch results
    pub fn from_status_object(error: &Value) -> ProviderError {
        let code = error.get("code").and_then(|c| c.as_u64()).unwrap_or(500) as u16;
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");

        match code {
            // google.rpc.Code values
            3 | 400 if Self::is_input_too_long(message) => {
                ProviderError::context_length_exceeded(PROVIDER, message)
            }
            3 | 400 => ProviderError::invalid_request(PROVIDER, message),
            8 | 429 => ProviderError::rate_limit(PROVIDER, None),
            4 => ProviderError::timeout(PROVIDER, message),
            14 | 500..=599 => ProviderError::provider_unavailable(PROVIDER, message),
            _ => ProviderError::api_error(PROVIDER, code, message),
        }
    }

    fn is_input_too_long(message: &str) -> bool {
        let message = message.to_ascii_lowercase();
        message.contains("exceeds the maximum number of tokens")
            || message.contains("input token count")
    }

    /// Retry hint from a `google.rpc.RetryInfo` detail, e.g. `"retryDelay": "30s"`
    fn extract_retry_after(body: &str) -> Option<u64> {
        let json: Value = serde_json::from_str(body).ok()?;
        json.get("error")?
            .get("details")?
            .as_array()?
            .iter()
            .filter_map(|d| d.get("retryDelay").and_then(|r| r.as_str()))
            .find_map(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
            .map(|seconds| seconds.ceil() as u64)
    }
}
