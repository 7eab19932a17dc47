//! Prompt templates
//!
//! Templates are plain text with `{{UPPER_SNAKE}}` placeholder tokens,
//! loaded once from `<prompts_dir>/<name>/001.txt`.

use crate::core::types::canonical::to_canonical_pretty;
use crate::core::types::{BillVotingRecord, MemberSummary};
use crate::utils::error::{GatewayError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Token replaced by JSON data in member, merge and condense templates
pub const RAW_INPUT_DATA: &str = "{{RAW_INPUT_DATA}}";
/// Token replaced by bill XML in the bill template
pub const BILL_XML: &str = "{{BILL_XML}}";

pub const SUMMARIZE_MEMBER: &str = "summarize-member";
pub const MERGE_SUMMARIES: &str = "merge-summaries";
pub const CONDENSE_SUMMARY: &str = "condense-summary";
pub const SUMMARIZE_BILL: &str = "summarize-bill";

const TEMPLATE_VERSION: &str = "001.txt";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[A-Z][A-Z0-9_]*\}\}").expect("Invalid placeholder regex"));

/// Placeholder tokens still present in `text`
pub fn unresolved_placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER.find_iter(text).map(|m| m.as_str()).collect()
}

/// A named prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read `<dir>/<name>/001.txt`
    pub fn load(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name).join(TEMPLATE_VERSION);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            GatewayError::config(format!("Failed to read prompt template {}: {}", path.display(), e))
        })?;
        debug!("Loaded prompt template {} from {}", name, path.display());
        Ok(Self::new(name, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute `content` for every occurrence of `token`.
    ///
    /// Fails when the template lacks the token or when a placeholder is left
    /// unresolved afterwards.
    pub fn render(&self, token: &str, content: &str) -> Result<String> {
        if !self.text.contains(token) {
            return Err(GatewayError::invalid_prompt(format!(
                "Template {} has no {} token",
                self.name, token
            )));
        }

        let rendered = self.text.replace(token, content);
        // Only the template's own text can carry stray tokens
        let stripped = self.text.replace(token, "");
        let leftover = unresolved_placeholders(&stripped);
        if !leftover.is_empty() {
            return Err(GatewayError::invalid_prompt(format!(
                "Template {} has unresolved placeholders: {}",
                self.name,
                leftover.join(", ")
            )));
        }
        Ok(rendered)
    }
}

/// The four templates the pipeline uses
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    pub summarize_member: PromptTemplate,
    pub merge_summaries: PromptTemplate,
    pub condense_summary: PromptTemplate,
    pub summarize_bill: PromptTemplate,
}

impl PromptLibrary {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            summarize_member: PromptTemplate::load(dir, SUMMARIZE_MEMBER)?,
            merge_summaries: PromptTemplate::load(dir, MERGE_SUMMARIES)?,
            condense_summary: PromptTemplate::load(dir, CONDENSE_SUMMARY)?,
            summarize_bill: PromptTemplate::load(dir, SUMMARIZE_BILL)?,
        })
    }

    /// One member batch: records as key-sorted, indented JSON with absent
    /// values dropped
    pub fn render_batch(&self, batch: &[BillVotingRecord]) -> Result<String> {
        let data = to_canonical_pretty(batch, true)?;
        self.summarize_member.render(RAW_INPUT_DATA, &data)
    }

    /// Merge step over validated partial summaries
    pub fn render_merge(&self, partials: &[MemberSummary]) -> Result<String> {
        let data = to_canonical_pretty(partials, false)?;
        self.merge_summaries.render(RAW_INPUT_DATA, &data)
    }

    /// Condensation of one full summary
    pub fn render_condense(&self, summary: &MemberSummary) -> Result<String> {
        let data = to_canonical_pretty(summary, false)?;
        self.condense_summary.render(RAW_INPUT_DATA, &data)
    }

    /// Bill summarization over simplified bill XML
    pub fn render_bill(&self, bill_xml: &str) -> Result<String> {
        self.summarize_bill.render(BILL_XML, bill_xml)
    }
}
