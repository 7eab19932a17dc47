//! Test fixtures and data factories
//!
//! Factories build real voting records; `template_answer` plays the part of
//! a model that follows the inline test templates.

use once_cell::sync::Lazy;
use regex::Regex;
use repsheet_genai::core::types::{Issues, PartyVotes, Vote};
use repsheet_genai::{
    BillVotingRecord, GenerationRequest, MemberSummary, PromptLibrary, PromptTemplate,
};

/// Cost-tier model of the default gateway configuration
pub const COST_MODEL: &str = "gemini-2.0-flash";

static BILL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r#""billID": "([^"]+)""#).unwrap());

/// Factory for voting records
pub struct VotingRecordFactory;

impl VotingRecordFactory {
    /// Record for bill `44-1-C-{n}`
    pub fn record(n: u32) -> BillVotingRecord {
        BillVotingRecord {
            summary: format!("Bill C-{} amends the Act in {} ways.", n, n),
            bill_id: format!("44-1-C-{}", n),
            bill_number: format!("C-{}", n),
            bill_became_law: Some(n % 3 != 0),
            member_vote: if n % 4 == 0 { Vote::Nay } else { Vote::Yea },
            members_party_vote: Some(PartyVotes::build(100, 20, 1)),
            issues: Issues {
                jobs: Some(format!("Jobs effect of C-{}.", n)),
                ..Default::default()
            },
            private_bill_of_member: false,
            bill_is_budget: None,
            parliament_yea_percentage: Some(0.55),
            member_in_government: Some(true),
            member_in_opposition: Some(false),
            member_in_supply_and_confidence: None,
        }
    }

    /// One record per bill number in `numbers`
    pub fn member(numbers: impl IntoIterator<Item = u32>) -> Vec<BillVotingRecord> {
        numbers.into_iter().map(Self::record).collect()
    }
}

/// Inline templates with recognizable prefixes
pub fn test_prompts() -> PromptLibrary {
    PromptLibrary {
        summarize_member: PromptTemplate::new("summarize-member", "Summarize:\n{{RAW_INPUT_DATA}}"),
        merge_summaries: PromptTemplate::new("merge-summaries", "Merge:\n{{RAW_INPUT_DATA}}"),
        condense_summary: PromptTemplate::new("condense-summary", "Condense:\n{{RAW_INPUT_DATA}}"),
        summarize_bill: PromptTemplate::new("summarize-bill", "Bill:\n{{BILL_XML}}"),
    }
}

fn member_json(summary: &str) -> String {
    serde_json::json!({ "summary": summary, "issues": { "jobs": "Jobs." } }).to_string()
}

/// Bill ids quoted in a batch prompt
pub fn prompt_bill_ids(prompt: &str) -> Vec<String> {
    BILL_ID.captures_iter(prompt).map(|c| c[1].to_string()).collect()
}

/// Answer a templated prompt the way a well-behaved model would.
///
/// Batch summaries link every bill they were given. When the batch holds
/// `poisoned`, the cost model links a bill that does not exist while every
/// other model gets it right.
pub fn template_answer(request: &GenerationRequest, poisoned: Option<&str>) -> Option<String> {
    let prompt = request.prompt.as_str();
    if let Some(data) = prompt.strip_prefix("Summarize:\n") {
        let ids = prompt_bill_ids(data);
        let hallucinate = request.model == COST_MODEL
            && poisoned.is_some_and(|bill| ids.iter().any(|id| id == bill));
        let mut links: Vec<String> = ids.iter().map(|id| format!("[{}]({})", id, id)).collect();
        if hallucinate {
            links.push("[C-9999](44-1-C-9999)".to_string());
        }
        return Some(member_json(&format!("Voted on {}.", links.join(", "))));
    }
    if let Some(data) = prompt.strip_prefix("Merge:\n") {
        let partials: Vec<MemberSummary> = serde_json::from_str(data).ok()?;
        let links: Vec<&str> = partials.iter().map(|p| p.summary.as_str()).collect();
        return Some(member_json(&links.join(" ")));
    }
    if prompt.starts_with("Condense:\n") {
        return Some("Short form.".to_string());
    }
    if prompt.starts_with("Bill:\n") {
        return Some(r#"{"summary": "A bill.", "issues": {}}"#.to_string());
    }
    None
}
