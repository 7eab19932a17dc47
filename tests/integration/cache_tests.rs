//! Generation cache integration tests
//!
//! Exercises the local filesystem backend end to end: on-disk layout,
//! persistence across cache instances and damaged entries.

#[cfg(test)]
mod tests {
    use repsheet_genai::config::{CacheBackend, CacheConfig};
    use repsheet_genai::{CacheKey, CacheMode, GatewayError, GenerationCache, GenerationRequest};
    use std::io::Read;
    use tempfile::TempDir;

    fn local_cache(dir: &TempDir, mode: CacheMode) -> GenerationCache {
        let config = CacheConfig {
            backend: CacheBackend::Local {
                path: dir.path().to_path_buf(),
            },
            key_prefix: "genai-cache/".to_string(),
            mode,
        };
        GenerationCache::from_config(&config).unwrap()
    }

    fn descriptor(prompt: &str) -> CacheKey {
        CacheKey::structured(&GenerationRequest::new("gemini-2.0-flash", prompt)).unwrap()
    }

    #[tokio::test]
    async fn test_entry_layout_on_disk() {
        let dir = TempDir::new().unwrap();
        let cache = local_cache(&dir, CacheMode::Json);
        let key = descriptor("Summarize the budget");
        cache.set(&key, &Some("A summary.".to_string())).await.unwrap();

        let id = cache.cache_key(&key).unwrap();
        assert_eq!(id.len(), 22);
        let entry = dir.path().join("genai-cache").join(&id);

        let compressed = std::fs::read(entry.join("data.json.xz")).unwrap();
        let mut raw = String::new();
        xz2::read::XzDecoder::new(compressed.as_slice())
            .read_to_string(&mut raw)
            .unwrap();
        assert_eq!(raw, "\"A summary.\"");

        let key_json = std::fs::read_to_string(entry.join("key.json")).unwrap();
        assert_eq!(
            key_json,
            r#"{"method":"generate_text","model":"gemini-2.0-flash","prompt":"Summarize the budget"}"#
        );
    }

    #[tokio::test]
    async fn test_entries_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let key = descriptor("persist me");
        let absent = descriptor("never written");

        let first = local_cache(&dir, CacheMode::Json);
        first.set(&key, &None::<String>).await.unwrap();
        first.set_nowait(&CacheKey::literal("plain"), &vec![1u32, 2, 3]).unwrap();
        assert_eq!(first.flush().await, 1);

        let second = local_cache(&dir, CacheMode::Json);
        second.init().await.unwrap();
        assert_eq!(second.get::<Option<String>>(&key).await.unwrap(), Some(None));
        assert_eq!(second.get::<Option<String>>(&absent).await.unwrap(), None);
        assert_eq!(
            second.get::<Vec<u32>>(&CacheKey::literal("plain")).await.unwrap(),
            Some(vec![1, 2, 3])
        );
        assert!(!dir.path().join("genai-cache/plain/key.json").exists());

        let stats = second.stats();
        assert_eq!((stats.hits, stats.misses), (2, 1));
    }

    #[tokio::test]
    async fn test_binary_mode_does_not_read_json_entries() {
        let dir = TempDir::new().unwrap();
        let key = descriptor("mode specific");

        local_cache(&dir, CacheMode::Json).set(&key, "json").await.unwrap();
        let binary = local_cache(&dir, CacheMode::Binary);
        assert!(!binary.has(&key).await.unwrap());

        binary.set(&key, "bincode").await.unwrap();
        assert_eq!(binary.get::<String>(&key).await.unwrap().as_deref(), Some("bincode"));

        let entry = dir.path().join("genai-cache").join(binary.cache_key(&key).unwrap());
        assert!(entry.join("data.json.xz").exists());
        assert!(entry.join("data.bincode.xz").exists());
    }

    #[tokio::test]
    async fn test_damaged_entry_is_a_cache_error() {
        let dir = TempDir::new().unwrap();
        let cache = local_cache(&dir, CacheMode::Json);
        let key = CacheKey::literal("damaged");
        cache.set(&key, "fine").await.unwrap();

        std::fs::write(dir.path().join("genai-cache/damaged/data.json.xz"), b"not xz").unwrap();

        let err = cache.get::<String>(&key).await.unwrap_err();
        assert!(matches!(err, GatewayError::Cache(_)));
        assert!(err.aborts_run());
    }
}
