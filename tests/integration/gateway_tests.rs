//! Gateway integration tests
//!
//! A gateway over a local cache directory, restarted between steps, must
//! answer finished work without calling a provider again.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedProvider, test_gateway};
    use repsheet_genai::config::{CacheBackend, CacheConfig};
    use repsheet_genai::core::providers::{BatchItem, BatchState};
    use repsheet_genai::{
        CacheKey, GatewayError, GenerateOptions, GenerationCache, ModelTier, ProviderError,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    fn local_cache(dir: &TempDir) -> GenerationCache {
        GenerationCache::from_config(&CacheConfig {
            backend: CacheBackend::Local {
                path: dir.path().to_path_buf(),
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn echo(name: &'static str) -> Arc<ScriptedProvider> {
        Arc::new(ScriptedProvider::new(name, |request| {
            if request.prompt.contains("too long") {
                Err(ProviderError::context_length_exceeded("echo", "input token count exceeds"))
            } else {
                Ok(Some(format!("{} says {}", request.model, request.prompt)))
            }
        }))
    }

    #[tokio::test]
    async fn test_answers_persist_across_restarts() {
        let dir = TempDir::new().unwrap();
        let prompts = ["first prompt", "a prompt that is too long"];

        let (cost, quality) = (echo("cost"), echo("quality"));
        let gateway = test_gateway(cost.clone(), quality.clone(), local_cache(&dir));
        let mut answers = Vec::new();
        for prompt in prompts {
            answers.push(
                gateway
                    .generate_text(prompt, ModelTier::Cost, GenerateOptions::default())
                    .await
                    .unwrap(),
            );
        }
        answers.push(
            gateway
                .generate_text(prompts[0], ModelTier::Quality, GenerateOptions::default())
                .await
                .unwrap(),
        );
        assert_eq!(answers[1], None);
        assert_eq!((cost.calls(), quality.calls()), (2, 1));

        let (cost, quality) = (echo("cost"), echo("quality"));
        let restarted = test_gateway(cost.clone(), quality.clone(), local_cache(&dir));
        let mut replayed = Vec::new();
        for prompt in prompts {
            replayed.push(
                restarted
                    .generate_text(prompt, ModelTier::Cost, GenerateOptions::default())
                    .await
                    .unwrap(),
            );
        }
        replayed.push(
            restarted
                .generate_text(prompts[0], ModelTier::Quality, GenerateOptions::default())
                .await
                .unwrap(),
        );

        assert_eq!(replayed, answers);
        assert_eq!((cost.calls(), quality.calls()), (0, 0));
        assert_eq!(restarted.provider_calls(), 0);
    }

    #[tokio::test]
    async fn test_collect_job_submitted_by_an_earlier_process() {
        let dir = TempDir::new().unwrap();
        let prompts = ["unit one", "unit two", "unit too long"];

        let cost = Arc::new(
            ScriptedProvider::new("cost", |request| {
                if request.prompt.contains("too long") {
                    Err(ProviderError::context_length_exceeded("cost", "too many tokens"))
                } else {
                    Ok(Some(format!("batched {}", request.prompt)))
                }
            })
            .with_batch_support(vec![BatchState::Succeeded]),
        );
        let gateway = test_gateway(cost.clone(), echo("quality"), local_cache(&dir));

        let items: Vec<BatchItem> = prompts
            .iter()
            .map(|prompt| {
                let request = gateway.request_for(ModelTier::Cost, prompt);
                let key = CacheKey::structured(&request).unwrap();
                BatchItem {
                    key: gateway.cache().cache_key(&key).unwrap(),
                    request,
                }
            })
            .collect();
        cost.insert_job("batches/42", items.clone());

        let collection = crate::assert_ok!(gateway.collect_batch_job("batches/42").await);
        assert_eq!(collection.job, "batches/42");
        assert_eq!(collection.stored.len(), 3);
        assert!(collection.errored.is_empty());

        let (fresh_cost, quality) = (echo("cost"), echo("quality"));
        let restarted = test_gateway(fresh_cost.clone(), quality, local_cache(&dir));
        let one = restarted
            .generate_text(prompts[0], ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();
        let long = restarted
            .generate_text(prompts[2], ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(one.as_deref(), Some("batched unit one"));
        assert_eq!(long, None);
        assert_eq!(fresh_cost.calls(), 0);
        // Stored under the literal unit key, so no descriptor is written
        assert!(!dir
            .path()
            .join("genai-cache")
            .join(&items[0].key)
            .join("key.json")
            .exists());
    }

    #[tokio::test]
    async fn test_collecting_unknown_job_fails() {
        let cost = Arc::new(
            ScriptedProvider::new("cost", |_| Ok(None)).with_batch_support(Vec::new()),
        );
        let gateway = test_gateway(cost, echo("quality"), GenerationCache::in_memory());

        let err = crate::assert_err!(gateway.collect_batch_job("batches/missing").await);
        assert!(matches!(err, GatewayError::Provider(_)));
        assert!(!err.aborts_run());
    }

    #[tokio::test]
    async fn test_batch_mode_round_trip() {
        let cost = Arc::new(
            ScriptedProvider::new("cost", |request| Ok(Some(request.prompt.to_uppercase())))
                .with_batch_support(vec![BatchState::Pending, BatchState::Running]),
        );
        let gateway = test_gateway(cost.clone(), echo("quality"), GenerationCache::in_memory());
        let prompts: Vec<String> = ["alpha", "beta", "alpha"].iter().map(|s| s.to_string()).collect();

        let answers = gateway
            .generate_text_batch(&prompts, ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(
            answers,
            vec![Some("ALPHA".to_string()), Some("BETA".to_string()), Some("ALPHA".to_string())]
        );
        assert_eq!(cost.batches(), 1);
        assert_eq!(cost.calls(), 0);

        let again = gateway
            .generate_text_batch(&prompts, ModelTier::Cost, GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(again, answers);
        assert_eq!(cost.batches(), 1);
    }
}
