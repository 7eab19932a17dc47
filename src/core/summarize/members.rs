//! Member summarization
//!
//! A member's voting record is split into batches, each summarized at the
//! cost tier and repaired; the validated partials are merged at the quality
//! tier. A member with any failed batch gets no summary at all.

use super::report::MemberRunReport;
use super::{SummarizeOptions, collect_all, write_prompt};
use crate::config::SummarizationConfig;
use crate::core::batching::{PromptLibrary, partition};
use crate::core::gateway::Gateway;
use crate::core::repair::{RepairFailure, RepairJob, SummaryRepairer, strip_code_fence};
use crate::core::types::{BillVotingRecord, MemberSummary, ModelTier};
use crate::utils::error::{GatewayError, Result};
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{error, info};

/// Bill ids a member's summary may link to
pub fn valid_bill_ids(records: &[BillVotingRecord]) -> HashSet<String> {
    records.iter().map(|r| r.bill_id.clone()).collect()
}

/// Summarizes members' voting records
#[derive(Debug, Clone)]
pub struct MemberSummarizer {
    repairer: SummaryRepairer,
    prompts: Arc<PromptLibrary>,
    batch_count: usize,
    shuffle_seed: u64,
}

impl MemberSummarizer {
    pub fn new(repairer: SummaryRepairer, prompts: Arc<PromptLibrary>, config: &SummarizationConfig) -> Self {
        Self {
            repairer,
            prompts,
            batch_count: config.batch_count(),
            shuffle_seed: config.shuffle_seed,
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    fn gateway(&self) -> &Gateway {
        self.repairer.gateway()
    }

    /// One prompt per non-empty batch of the shuffled record
    pub fn member_prompts(&self, records: &[BillVotingRecord]) -> Result<Vec<String>> {
        partition(records, self.batch_count, self.shuffle_seed)
            .iter()
            .filter(|batch| !batch.is_empty())
            .map(|batch| self.prompts.render_batch(batch))
            .collect()
    }

    pub fn merge_prompt(&self, partials: &[MemberSummary]) -> Result<String> {
        self.prompts.render_merge(partials)
    }

    /// Full summary of one member's voting record
    pub async fn generate_member_summary(
        &self,
        member_id: &str,
        records: &[BillVotingRecord],
        options: &SummarizeOptions,
    ) -> std::result::Result<MemberSummary, RepairFailure> {
        if records.is_empty() {
            return Err(GatewayError::validation(format!("member {} has no voting records", member_id)).into());
        }

        let generate = options.generate_options();
        let valid = valid_bill_ids(records);
        let prompts = self.member_prompts(records)?;
        if let Some(dir) = &options.dump_prompts_to {
            for (i, prompt) in prompts.iter().enumerate() {
                write_prompt(dir, member_id, &format!("batch-{:02}", i), prompt).await?;
            }
        }
        info!(
            "Summarizing member {} ({} votes) in {} batches",
            member_id,
            records.len(),
            prompts.len()
        );

        let responses = if options.use_batch_api {
            self.gateway()
                .generate_text_batch(&prompts, ModelTier::Cost, generate)
                .await?
        } else {
            let calls = prompts
                .iter()
                .map(|prompt| self.gateway().generate_text(prompt, ModelTier::Cost, generate));
            collect_all(join_all(calls).await, GatewayError::aborts_run)?
        };

        let jobs: Vec<RepairJob<'_>> = prompts
            .iter()
            .enumerate()
            .map(|(i, prompt)| RepairJob::member(format!("member {}/batch {}", member_id, i), prompt, &valid))
            .collect();
        let repairs = jobs.iter().zip(responses).map(|(job, response)| {
            self.repairer
                .repair::<MemberSummary>(job, response, ModelTier::Cost, generate)
        });
        let partials = collect_all(join_all(repairs).await, RepairFailure::aborts_run)?;

        let merge_prompt = self.merge_prompt(&partials)?;
        if let Some(dir) = &options.dump_prompts_to {
            write_prompt(dir, member_id, "merge", &merge_prompt).await?;
        }
        let merged = self
            .gateway()
            .generate_text(&merge_prompt, ModelTier::Quality, generate)
            .await?;
        let job = RepairJob::member(format!("member {}/merge", member_id), &merge_prompt, &valid);
        self.repairer
            .repair(&job, merged, ModelTier::Quality, generate)
            .await
    }

    /// Short plain-text form of a full summary
    pub async fn condense_member_summary(
        &self,
        member_id: &str,
        summary: &MemberSummary,
        options: &SummarizeOptions,
    ) -> std::result::Result<String, RepairFailure> {
        let prompt = self.prompts.render_condense(summary)?;
        if let Some(dir) = &options.dump_prompts_to {
            write_prompt(dir, member_id, "condense", &prompt).await?;
        }
        let text = self
            .gateway()
            .generate_text(&prompt, ModelTier::Quality, options.generate_options())
            .await?;
        text.map(|t| strip_code_fence(&t).to_string())
            .filter(|t| !t.is_empty())
            .ok_or(RepairFailure::EmptyResponse {
                tier: ModelTier::Quality,
            })
    }

    /// Summarize and condense every member concurrently.
    ///
    /// Failed members are listed in the report. Only errors that abort the
    /// run (storage faults, bad prompts, gateway misuse) are returned.
    pub async fn summarize_members(
        &self,
        members: &BTreeMap<String, Vec<BillVotingRecord>>,
        options: &SummarizeOptions,
    ) -> Result<MemberRunReport> {
        info!("Summarizing {} members", members.len());
        let runs = members.iter().map(|(id, records)| async move {
            (id, self.generate_member_summary(id, records, options).await)
        });

        let mut report = MemberRunReport::default();
        for (id, result) in join_all(runs).await {
            match result {
                Ok(summary) => {
                    report.summaries.insert(id.clone(), summary);
                }
                Err(RepairFailure::Gateway(e)) if e.aborts_run() => return Err(e),
                Err(failure) => {
                    error!("No summary for member {}: {}", id, failure);
                    report.failed.push(id.clone());
                }
            }
        }

        let condensations = report.summaries.iter().map(|(id, summary)| async move {
            (id.clone(), self.condense_member_summary(id, summary, options).await)
        });
        for (id, result) in join_all(condensations).await {
            match result {
                Ok(text) => {
                    report.condensed.insert(id, text);
                }
                Err(RepairFailure::Gateway(e)) if e.aborts_run() => return Err(e),
                Err(failure) => {
                    error!("No condensed summary for member {}: {}", id, failure);
                    report.condense_failed.push(id);
                }
            }
        }

        report.failed.sort();
        report.condense_failed.sort();
        info!(
            "Summarized {} of {} members ({} failed, {} condensations failed)",
            report.summaries.len(),
            members.len(),
            report.failed.len(),
            report.condense_failed.len()
        );
        Ok(report)
    }
}
