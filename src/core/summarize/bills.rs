//! Bill summarization

use super::report::BillRunReport;
use super::{SummarizeOptions, write_prompt};
use crate::core::batching::PromptLibrary;
use crate::core::repair::{RepairFailure, RepairJob, SummaryRepairer};
use crate::core::types::{BillId, BillSummary, ModelTier};
use crate::utils::error::Result;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

static XREF_EXTERNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<XRefExternal[^>]*>(.*?)</XRefExternal>").expect("Invalid XRefExternal regex")
});

/// Replace external cross-reference elements with their text
pub fn simplify_bill_xml(xml: &str) -> String {
    XREF_EXTERNAL.replace_all(xml, "$1").into_owned()
}

/// Read `<bill-id>.xml` files from a directory. Other files are skipped.
pub fn load_bill_texts(dir: &Path) -> Result<BTreeMap<BillId, String>> {
    let mut bills = BTreeMap::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("xml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match stem.parse::<BillId>() {
            Ok(bill) => {
                bills.insert(bill, std::fs::read_to_string(&path)?);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} bill texts from {}", bills.len(), dir.display());
    Ok(bills)
}

/// Summarizes bill texts at the cost tier
#[derive(Debug, Clone)]
pub struct BillSummarizer {
    repairer: SummaryRepairer,
    prompts: Arc<PromptLibrary>,
}

impl BillSummarizer {
    pub fn new(repairer: SummaryRepairer, prompts: Arc<PromptLibrary>) -> Self {
        Self { repairer, prompts }
    }

    pub fn bill_prompt(&self, xml: &str) -> Result<String> {
        self.prompts.render_bill(&simplify_bill_xml(xml))
    }

    /// Summarize one bill. `Ok(None)` means the text was too long for the
    /// model and the bill is skipped.
    pub async fn summarize_bill(
        &self,
        bill: &BillId,
        xml: &str,
        options: &SummarizeOptions,
    ) -> std::result::Result<Option<BillSummary>, RepairFailure> {
        let prompt = self.bill_prompt(xml)?;
        if let Some(dir) = &options.dump_prompts_to {
            write_prompt(dir, &bill.to_string(), "bill", &prompt).await?;
        }

        let generate = options.generate_options();
        let Some(response) = self
            .repairer
            .gateway()
            .generate_text(&prompt, ModelTier::Cost, generate)
            .await?
        else {
            warn!("No summary generated for bill {}, likely exceeded the token limit", bill);
            return Ok(None);
        };

        let job = RepairJob::bill(format!("bill {}", bill), &prompt);
        self.repairer
            .repair(&job, Some(response), ModelTier::Cost, generate)
            .await
            .map(Some)
    }

    /// Summarize every bill concurrently
    pub async fn summarize_bills(
        &self,
        bills: &BTreeMap<BillId, String>,
        options: &SummarizeOptions,
    ) -> Result<BillRunReport> {
        info!("Summarizing {} bills", bills.len());
        let runs = bills.iter().map(|(bill, xml)| async move {
            (bill.to_string(), self.summarize_bill(bill, xml, options).await)
        });

        let mut report = BillRunReport::default();
        for (id, result) in join_all(runs).await {
            match result {
                Ok(Some(summary)) => {
                    report.summaries.insert(id, summary);
                }
                Ok(None) => report.skipped.push(id),
                Err(RepairFailure::Gateway(e)) if e.aborts_run() => return Err(e),
                Err(failure) => {
                    error!("No summary for bill {}: {}", id, failure);
                    report.failed.push(id);
                }
            }
        }

        report.skipped.sort();
        report.failed.sort();
        info!(
            "Summarized {} of {} bills ({} skipped, {} failed)",
            report.summaries.len(),
            bills.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
