//! Structured summaries produced by the pipeline

use super::issues::Issues;
use serde::{Deserialize, Serialize};

/// Summary of a single bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub summary: String,
    pub issues: Issues,
}

/// Summary of a member's voting record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub summary: String,
    pub issues: Issues,
}
