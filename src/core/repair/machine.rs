//! Validation and repair of model output
//!
//! Each model answer walks `RawText -> Stripped -> LinkChecked -> Parsed`,
//! or ends in `Failed`. The transitions are pure; [`SummaryRepairer`]
//! drives them and decides, on failure, whether to escalate to the quality
//! tier, retry the quality tier past the cache, or give up.

use super::cleanup::{escape_newlines_in_strings, lenient_json_fixups, strip_code_fence};
use super::corrections::CorrectionTable;
use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::links::broken_bill_links;
use crate::core::cache::CacheKey;
use crate::core::gateway::{Gateway, GenerateOptions};
use crate::core::types::ModelTier;
use crate::utils::error::GatewayError;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Why a unit produced no summary
#[derive(Error, Debug)]
pub enum RepairFailure {
    #[error("{tier} tier returned no text")]
    EmptyResponse { tier: ModelTier },

    #[error("unresolved bill links: {}", links.join(", "))]
    BrokenLinks { links: Vec<String> },

    #[error("schema validation failed: {message}")]
    Invalid { message: String },

    /// The gateway failed while generating or regenerating the unit
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl RepairFailure {
    /// Whether the whole run must stop, not just this unit
    pub fn aborts_run(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.aborts_run())
    }

    /// Another quality-tier sample might fix it
    fn is_resamplable(&self) -> bool {
        matches!(self, Self::EmptyResponse { .. } | Self::Invalid { .. })
    }
}

/// Repair progress of one model answer
#[derive(Debug)]
pub enum RepairState<T> {
    RawText(Option<String>),
    Stripped(String),
    LinkChecked(String),
    Parsed(T),
    Failed {
        failure: RepairFailure,
        text: Option<String>,
    },
}

/// What the transitions need to know about the current attempt
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub unit: &'a str,
    pub tier: ModelTier,
    pub valid_bill_ids: Option<&'a HashSet<String>>,
    pub corrections: &'a CorrectionTable,
    pub lenient: bool,
}

impl<T: DeserializeOwned> RepairState<T> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Parsed(_) | Self::Failed { .. })
    }

    /// Take one transition
    pub fn advance(self, ctx: &StepContext<'_>) -> Self {
        match self {
            Self::RawText(None) => Self::Failed {
                failure: RepairFailure::EmptyResponse { tier: ctx.tier },
                text: None,
            },
            Self::RawText(Some(text)) => {
                let stripped = escape_newlines_in_strings(strip_code_fence(&text));
                if ctx.lenient {
                    Self::Stripped(lenient_json_fixups(&stripped))
                } else {
                    Self::Stripped(stripped)
                }
            }
            Self::Stripped(text) => check_links(text, ctx),
            Self::LinkChecked(text) => match serde_json::from_str::<T>(&text) {
                Ok(value) => Self::Parsed(value),
                Err(e) => Self::Failed {
                    failure: RepairFailure::Invalid {
                        message: e.to_string(),
                    },
                    text: Some(text),
                },
            },
            terminal => terminal,
        }
    }

    /// Advance until a terminal state
    pub fn run(self, ctx: &StepContext<'_>) -> Result<T, (RepairFailure, Option<String>)> {
        let mut state = self;
        loop {
            match state {
                Self::Parsed(value) => return Ok(value),
                Self::Failed { failure, text } => return Err((failure, text)),
                pending => state = pending.advance(ctx),
            }
        }
    }
}

fn check_links<T>(text: String, ctx: &StepContext<'_>) -> RepairState<T> {
    let Some(valid) = ctx.valid_bill_ids else {
        return RepairState::LinkChecked(text);
    };
    let broken = broken_bill_links(&text, valid);
    if broken.is_empty() {
        return RepairState::LinkChecked(text);
    }

    // Only the quality tier's output is worth patching
    if ctx.tier == ModelTier::Cost {
        return RepairState::Failed {
            failure: RepairFailure::BrokenLinks {
                links: broken.into_iter().collect(),
            },
            text: Some(text),
        };
    }

    let (corrected, fired) = ctx.corrections.apply(&text, ctx.unit);
    let remaining = broken_bill_links(&corrected, valid);
    if remaining.is_empty() {
        debug!("{} corrections repaired every link in {}", fired, ctx.unit);
        RepairState::LinkChecked(corrected)
    } else {
        RepairState::Failed {
            failure: RepairFailure::BrokenLinks {
                links: remaining.into_iter().collect(),
            },
            text: Some(corrected),
        }
    }
}

/// One unit of model output to repair
#[derive(Debug, Clone)]
pub struct RepairJob<'a> {
    /// Label for logs and diagnostic file names
    pub unit: String,
    /// The prompt that produced the output, resubmitted on escalation
    pub prompt: &'a str,
    /// Known bill ids; `None` skips link checking
    pub valid_bill_ids: Option<&'a HashSet<String>>,
    /// Whether a cost-tier failure may be resubmitted to the quality tier
    pub escalate: bool,
    /// Apply the lenient bill JSON fixups
    pub lenient: bool,
}

impl<'a> RepairJob<'a> {
    /// Member summaries: links checked, escalation allowed
    pub fn member(unit: impl Into<String>, prompt: &'a str, valid_bill_ids: &'a HashSet<String>) -> Self {
        Self {
            unit: unit.into(),
            prompt,
            valid_bill_ids: Some(valid_bill_ids),
            escalate: true,
            lenient: false,
        }
    }

    /// Bill summaries: no links, no escalation, lenient fixups
    pub fn bill(unit: impl Into<String>, prompt: &'a str) -> Self {
        Self {
            unit: unit.into(),
            prompt,
            valid_bill_ids: None,
            escalate: false,
            lenient: true,
        }
    }
}

/// Drives [`RepairState`] across escalation and retries
#[derive(Debug, Clone)]
pub struct SummaryRepairer {
    gateway: Arc<Gateway>,
    corrections: Arc<CorrectionTable>,
    diagnostics: DiagnosticSink,
    quality_retries: u32,
}

impl SummaryRepairer {
    pub fn new(
        gateway: Arc<Gateway>,
        corrections: Arc<CorrectionTable>,
        diagnostics: DiagnosticSink,
        quality_retries: u32,
    ) -> Self {
        Self {
            gateway,
            corrections,
            diagnostics,
            quality_retries,
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Repair `response`, generated from `job.prompt` at `tier`, into a `T`.
    ///
    /// A cost-tier failure is resubmitted once to the quality tier (sync
    /// mode) when the job allows it. An empty or unparsable quality-tier
    /// answer is resampled up to the configured retry count, bypassing the
    /// cache each time. Broken links the correction table cannot fix end the
    /// unit at once. Terminal failures are dumped to the diagnostic sink.
    pub async fn repair<T: DeserializeOwned>(
        &self,
        job: &RepairJob<'_>,
        response: Option<String>,
        tier: ModelTier,
        options: GenerateOptions,
    ) -> Result<T, RepairFailure> {
        let mut tier = tier;
        let mut response = response;
        let mut escalated = false;
        let mut retries_left = self.quality_retries;

        loop {
            let ctx = StepContext {
                unit: &job.unit,
                tier,
                valid_bill_ids: job.valid_bill_ids,
                corrections: &self.corrections,
                lenient: job.lenient,
            };

            let (failure, text) = match RepairState::<T>::RawText(response).run(&ctx) {
                Ok(value) => return Ok(value),
                Err(failed) => failed,
            };

            if tier == ModelTier::Cost && job.escalate && !escalated {
                warn!("{} failed at the cost tier ({}), escalating", job.unit, failure);
                escalated = true;
                tier = ModelTier::Quality;
                response = self.gateway.generate_text(job.prompt, tier, options).await?;
                continue;
            }

            if tier == ModelTier::Quality && failure.is_resamplable() && retries_left > 0 {
                retries_left -= 1;
                warn!(
                    "{} failed at the quality tier ({}), resampling ({} retries left)",
                    job.unit, failure, retries_left
                );
                response = self
                    .gateway
                    .generate_text(job.prompt, tier, options.with_invalidate_cache(true))
                    .await?;
                continue;
            }

            error!("{} failed at the {} tier: {}", job.unit, tier, failure);
            self.dump(job, tier, &failure, text).await;
            return Err(failure);
        }
    }

    async fn dump(&self, job: &RepairJob<'_>, tier: ModelTier, failure: &RepairFailure, text: Option<String>) {
        let request = self.gateway.request_for(tier, job.prompt);
        let cache_key = CacheKey::structured(&request)
            .and_then(|key| self.gateway.cache().cache_key(&key))
            .ok();
        let (broken_links, error) = match failure {
            RepairFailure::BrokenLinks { links } => (links.clone(), None),
            other => (Vec::new(), Some(other.to_string())),
        };
        self.diagnostics
            .write(&Diagnostic {
                timestamp: Utc::now(),
                unit: job.unit.clone(),
                tier,
                cache_key,
                text,
                broken_links,
                error,
            })
            .await;
    }
}
