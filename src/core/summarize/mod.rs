//! Summarization orchestrator
//!
//! Sequences batching, generation and repair across many members or bills.
//! Units run concurrently; the gateway's admission limit is the only
//! throttle.

pub mod bills;
pub mod members;
pub mod report;


pub use bills::{BillSummarizer, load_bill_texts, simplify_bill_xml};
pub use members::{MemberSummarizer, valid_bill_ids};
pub use report::{BillRunReport, MemberRunReport};

use crate::config::AppConfig;
use crate::core::batching::PromptLibrary;
use crate::core::cache::GenerationCache;
use crate::core::gateway::{Gateway, GenerateOptions};
use crate::core::repair::{CorrectionTable, DiagnosticSink, SummaryRepairer};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Per-run options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizeOptions {
    /// Bypass cache reads for every generation of the run
    pub invalidate_cache: bool,
    /// Write every rendered prompt under this directory
    pub dump_prompts_to: Option<PathBuf>,
    /// Submit member batch prompts as one provider-side job
    pub use_batch_api: bool,
}

impl SummarizeOptions {
    /// Regeneration: fresh answers, prompts dumped for inspection
    pub fn regenerate(dump_prompts_to: impl Into<PathBuf>) -> Self {
        Self {
            invalidate_cache: true,
            dump_prompts_to: Some(dump_prompts_to.into()),
            use_batch_api: false,
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions::default().with_invalidate_cache(self.invalidate_cache)
    }
}

/// Everything a run needs, wired from configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub gateway: Arc<Gateway>,
    pub members: MemberSummarizer,
    pub bills: BillSummarizer,
}

impl Pipeline {
    /// Build over an existing gateway
    pub fn new(
        gateway: Arc<Gateway>,
        prompts: Arc<PromptLibrary>,
        corrections: Arc<CorrectionTable>,
        diagnostics: DiagnosticSink,
        config: &AppConfig,
    ) -> Self {
        let repairer = SummaryRepairer::new(
            gateway.clone(),
            corrections,
            diagnostics,
            config.summarization.quality_retries,
        );
        Self {
            members: MemberSummarizer::new(repairer.clone(), prompts.clone(), &config.summarization),
            bills: BillSummarizer::new(repairer, prompts),
            gateway,
        }
    }

    /// Open the cache, check it is reachable, connect the providers and
    /// load templates and corrections
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let cache = GenerationCache::from_config(&config.cache)?;
        cache.init().await?;
        let gateway = Arc::new(Gateway::from_config(config, cache)?);
        let prompts = Arc::new(PromptLibrary::load(&config.summarization.prompts_dir)?);
        let corrections = Arc::new(CorrectionTable::load(&config.summarization.corrections_path)?);
        let diagnostics = DiagnosticSink::new(&config.summarization.diagnostics_dir);
        Ok(Self::new(gateway, prompts, corrections, diagnostics, config))
    }
}

/// Keep every success, or return the first error, preferring one that
/// aborts the run
pub(crate) fn collect_all<T, E>(
    results: Vec<std::result::Result<T, E>>,
    aborts_run: impl Fn(&E) -> bool,
) -> std::result::Result<Vec<T>, E> {
    let mut values = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(e) if aborts_run(&e) => return Err(e),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(values),
    }
}

async fn write_prompt(dir: &Path, unit: &str, name: &str, prompt: &str) -> Result<()> {
    let dir = dir.join(unit);
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(format!("{}.txt", name));
    tokio::fs::write(&path, prompt).await?;
    debug!("Dumped prompt to {}", path.display());
    Ok(())
}
