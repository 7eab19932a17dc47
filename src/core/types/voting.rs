//! Voting records handed over by the database layer

use super::issues::Issues;
use serde::{Deserialize, Serialize};

/// How a member voted on a bill's deciding vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yea,
    Nay,
    Abstain,
}

/// Aggregate votes of one party on one vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyVotes {
    pub yea: u32,
    pub nay: u32,
    pub abstain: u32,
    pub yea_percentage: f64,
}

impl PartyVotes {
    pub fn build(yea: u32, nay: u32, abstain: u32) -> Self {
        let total = yea + nay + abstain;
        let yea_percentage = if total == 0 {
            0.0
        } else {
            f64::from(yea) / f64::from(total)
        };
        Self {
            yea,
            nay,
            abstain,
            yea_percentage,
        }
    }
}

/// One bill plus one member's vote on it, with party and chamber context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillVotingRecord {
    pub summary: String,
    #[serde(rename = "billID")]
    pub bill_id: String,
    pub bill_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_became_law: Option<bool>,
    pub member_vote: Vote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members_party_vote: Option<PartyVotes>,
    pub issues: Issues,
    #[serde(default)]
    pub private_bill_of_member: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_is_budget: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parliament_yea_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_in_government: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_in_opposition: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_in_supply_and_confidence: Option<bool>,
}
