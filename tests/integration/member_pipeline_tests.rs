//! Member pipeline integration tests
//!
//! A full member run over scripted tiers: 23 cost-tier batches, repair with
//! escalation, the quality-tier merge and condensation.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{COST_MODEL, prompt_bill_ids, template_answer};
    use crate::common::{ScriptedProvider, VotingRecordFactory, test_gateway, test_pipeline};
    use repsheet_genai::core::providers::BatchState;
    use repsheet_genai::{
        DiagnosticSink, GenerationCache, Pipeline, SummarizeOptions, broken_bill_links,
    };
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    const POISONED: &str = "44-1-C-13";

    struct Run {
        cost: Arc<ScriptedProvider>,
        quality: Arc<ScriptedProvider>,
        pipeline: Pipeline,
    }

    fn run_over(cache: GenerationCache, poisoned: Option<&'static str>, batch: bool) -> Run {
        let cost = ScriptedProvider::new("cost", move |request| Ok(template_answer(request, poisoned)));
        let cost = Arc::new(if batch {
            cost.with_batch_support(vec![BatchState::Running])
        } else {
            cost
        });
        let quality = Arc::new(ScriptedProvider::new("quality", move |request| {
            Ok(template_answer(request, poisoned))
        }));
        let gateway = test_gateway(cost.clone(), quality.clone(), cache);
        Run {
            cost,
            quality,
            pipeline: test_pipeline(gateway, DiagnosticSink::disabled()),
        }
    }

    #[tokio::test]
    async fn test_fifty_votes_make_twenty_three_batches() {
        let run = run_over(GenerationCache::in_memory(), None, false);
        let votes = VotingRecordFactory::member(1..=50);

        let prompts = run.pipeline.members.member_prompts(&votes).unwrap();
        assert_eq!(prompts.len(), 23);
        let mut seen: Vec<String> = prompts.iter().flat_map(|p| prompt_bill_ids(p)).collect();
        seen.sort();
        let mut expected: Vec<String> = votes.iter().map(|v| v.bill_id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_poisoned_batch_escalates_once() {
        let run = run_over(GenerationCache::in_memory(), Some(POISONED), false);
        let votes = VotingRecordFactory::member(1..=50);
        let valid: HashSet<String> = votes.iter().map(|v| v.bill_id.clone()).collect();

        let summary = run
            .pipeline
            .members
            .generate_member_summary("m1", &votes, &SummarizeOptions::default())
            .await
            .unwrap();

        assert_eq!(run.cost.calls(), 23);
        // One escalation and the merge
        assert_eq!(run.quality.calls(), 2);

        let merge = run
            .quality
            .prompts()
            .into_iter()
            .find(|p| p.starts_with("Merge:\n"))
            .unwrap();
        let partials: Vec<serde_json::Value> =
            serde_json::from_str(merge.trim_start_matches("Merge:\n")).unwrap();
        assert_eq!(partials.len(), 23);
        assert!(broken_bill_links(&merge, &valid).is_empty());

        assert!(broken_bill_links(&summary.summary, &valid).is_empty());
        for vote in &votes {
            assert!(summary.summary.contains(&format!("({})", vote.bill_id)));
        }
    }

    #[tokio::test]
    async fn test_cached_rerun_is_free_and_identical() {
        let cache = GenerationCache::in_memory();
        let members = BTreeMap::from([
            ("m1".to_string(), VotingRecordFactory::member(1..=50)),
            ("m2".to_string(), VotingRecordFactory::member(40..=60)),
        ]);
        let options = SummarizeOptions::default();

        let first = run_over(cache.clone(), Some(POISONED), false);
        let report = first.pipeline.members.summarize_members(&members, &options).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.condensed["m2"], "Short form.");

        let second = run_over(cache, Some(POISONED), false);
        let replay = second.pipeline.members.summarize_members(&members, &options).await.unwrap();

        assert_eq!(replay, report);
        assert_eq!((second.cost.calls(), second.quality.calls()), (0, 0));
    }

    #[tokio::test]
    async fn test_batch_api_run_matches_sync_run() {
        let votes = VotingRecordFactory::member(1..=50);
        let sync = run_over(GenerationCache::in_memory(), Some(POISONED), false);
        let expected = sync
            .pipeline
            .members
            .generate_member_summary("m1", &votes, &SummarizeOptions::default())
            .await
            .unwrap();

        let batched = run_over(GenerationCache::in_memory(), Some(POISONED), true);
        let options = SummarizeOptions {
            use_batch_api: true,
            ..Default::default()
        };
        let summary = batched
            .pipeline
            .members
            .generate_member_summary("m1", &votes, &options)
            .await
            .unwrap();

        assert_eq!(summary, expected);
        assert_eq!(batched.cost.batches(), 1);
        assert_eq!(batched.cost.calls(), 0);
        assert_eq!(batched.quality.calls(), 2);
    }

    #[tokio::test]
    async fn test_unrepairable_member_dumps_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        // Both tiers link a bill that does not exist
        let cost = Arc::new(ScriptedProvider::new("cost", |request| {
            let mut forced = request.clone();
            forced.model = COST_MODEL.to_string();
            Ok(template_answer(&forced, Some(POISONED)))
        }));
        let quality = Arc::new(ScriptedProvider::new("quality", |request| {
            let mut forced = request.clone();
            forced.model = COST_MODEL.to_string();
            Ok(template_answer(&forced, Some(POISONED)))
        }));
        let gateway = test_gateway(cost.clone(), quality.clone(), GenerationCache::in_memory());
        let pipeline = test_pipeline(gateway, DiagnosticSink::new(dir.path()));
        let members = BTreeMap::from([
            ("bad".to_string(), VotingRecordFactory::member(1..=50)),
            ("good".to_string(), VotingRecordFactory::member(100..=120)),
        ]);

        let report = pipeline
            .members
            .summarize_members(&members, &SummarizeOptions::default())
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["bad"]);
        assert!(report.summaries.contains_key("good"));
        assert!(!report.is_complete());
        let dumps: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(dumps.len(), 1);
    }
}
