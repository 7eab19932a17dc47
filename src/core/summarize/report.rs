//! Run reports handed to the database loader

use crate::core::types::{BillSummary, MemberSummary};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of summarizing a set of members
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberRunReport {
    /// Full summaries by member id
    pub summaries: BTreeMap<String, MemberSummary>,
    /// Condensed summaries by member id
    pub condensed: BTreeMap<String, String>,
    /// Members with no summary this run, sorted
    pub failed: Vec<String>,
    /// Members whose full summary succeeded but condensation did not, sorted
    pub condense_failed: Vec<String>,
}

impl MemberRunReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.condense_failed.is_empty()
    }
}

/// Outcome of summarizing a set of bills
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillRunReport {
    pub summaries: BTreeMap<String, BillSummary>,
    /// Bills whose text was too long for the model, sorted
    pub skipped: Vec<String>,
    /// Bills whose output could not be repaired, sorted
    pub failed: Vec<String>,
}
