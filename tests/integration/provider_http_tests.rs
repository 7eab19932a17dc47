//! Provider HTTP integration tests
//!
//! Runs the real Gemini and Anthropic clients against a local mock server,
//! through the gateway, so wire format, error mapping, retries and caching
//! are exercised together.

#[cfg(test)]
mod tests {
    use crate::common::fast_gateway_config;
    use repsheet_genai::core::providers::{AnthropicConfig, GeminiConfig};
    use repsheet_genai::{
        AnthropicClient, CacheKey, Gateway, GenerateOptions, GenerationCache, GeminiClient,
        ModelTier,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn gateway(server: &MockServer) -> Gateway {
        let gemini = GeminiClient::new(GeminiConfig::new("gemini-key").with_base_url(server.uri())).unwrap();
        let anthropic =
            AnthropicClient::new(AnthropicConfig::new("anthropic-key").with_base_url(server.uri())).unwrap();
        Gateway::new(
            Arc::new(gemini),
            Arc::new(anthropic),
            GenerationCache::in_memory(),
            &fast_gateway_config(),
        )
        .with_poll_interval(Duration::from_millis(5))
    }

    fn gemini_text(text: &str) -> Value {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
        })
    }

    #[tokio::test]
    async fn test_gemini_generate_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE))
            .and(header("x-goog-api-key", "gemini-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Summarize C-1"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("C-1 passed.")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        for _ in 0..2 {
            let text = gateway
                .generate_text("Summarize C-1", ModelTier::Cost, GenerateOptions::default())
                .await
                .unwrap();
            assert_eq!(text.as_deref(), Some("C-1 passed."));
        }
    }

    #[tokio::test]
    async fn test_gemini_oversized_prompt_is_cached_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "The input token count (1200000) exceeds the maximum number of tokens allowed (1048576).",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        for _ in 0..2 {
            let text = gateway
                .generate_text("An appropriation act", ModelTier::Cost, GenerateOptions::default())
                .await
                .unwrap();
            assert_eq!(text, None);
        }
    }

    #[tokio::test]
    async fn test_gemini_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}
            })))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("Finally.")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let text = gateway
            .generate_text("busy", ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Finally."));
        assert_eq!(gateway.provider_calls(), 3);
    }

    #[tokio::test]
    async fn test_anthropic_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "anthropic-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-7-sonnet-latest",
                "messages": [{"role": "user", "content": "Merge these"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "{\"summary\": \"merged\"}"}],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({
                "messages": [{"role": "user", "content": "Every bill at once"}]
            })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "type": "error",
                "error": {"type": "invalid_request_error", "message": "prompt is too long: 250000 tokens > 200000 maximum"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let merged = gateway
            .generate_text("Merge these", ModelTier::Quality, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(merged.as_deref(), Some("{\"summary\": \"merged\"}"));

        let too_long = gateway
            .generate_text("Every bill at once", ModelTier::Quality, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(too_long, None);
    }

    #[tokio::test]
    async fn test_gemini_batch_job_flow() {
        let server = MockServer::start().await;
        let gateway = gateway(&server);
        let prompts: Vec<String> = vec!["Batch one".to_string(), "Batch two".to_string()];
        let keys: Vec<String> = prompts
            .iter()
            .map(|p| {
                let key = CacheKey::structured(&gateway.request_for(ModelTier::Cost, p)).unwrap();
                gateway.cache().cache_key(&key).unwrap()
            })
            .collect();

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:batchGenerateContent"))
            .and(header("x-goog-api-key", "gemini-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "batches/123",
                "metadata": {"name": "batches/123", "state": "BATCH_STATE_PENDING"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta/batches/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "batches/123",
                "metadata": {"state": "BATCH_STATE_RUNNING"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta/batches/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "batches/123",
                "metadata": {"state": "BATCH_STATE_SUCCEEDED"},
                "done": true,
                "response": {"inlinedResponses": {"inlinedResponses": [
                    {"metadata": {"key": keys[1]}, "response": gemini_text("Second.")},
                    {"metadata": {"key": keys[0]}, "response": gemini_text("First.")}
                ]}}
            })))
            .mount(&server)
            .await;
        // Any synchronous fallback would hit this
        Mock::given(method("POST"))
            .and(path(GENERATE))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let answers = gateway
            .generate_text_batch(&prompts, ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            answers,
            vec![Some("First.".to_string()), Some("Second.".to_string())]
        );

        let cached = gateway
            .generate_text("Batch two", ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(cached.as_deref(), Some("Second."));
    }
}
