//! Policy issue breakdown shared by bill and member summaries

use serde::{Deserialize, Serialize};

/// One optional free-text paragraph per policy issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issues {
    pub inflation_and_cost_of_living: Option<String>,
    pub jobs: Option<String>,
    pub taxation: Option<String>,
    pub spending: Option<String>,
    pub healthcare: Option<String>,
    pub childcare: Option<String>,
    pub seniors_and_pensions: Option<String>,
    pub climate: Option<String>,
    pub environmental_protection: Option<String>,
    pub energy: Option<String>,
    pub reconciliation: Option<String>,
    pub immigration_and_integration: Option<String>,
    pub income_inequality_and_poverty: Option<String>,
    pub reproductive_rights: Option<String>,
    pub gender_and_sexuality: Option<String>,
    pub racism: Option<String>,
    pub crime: Option<String>,
    pub gun_control: Option<String>,
    pub defense: Option<String>,
    pub foreign_aid: Option<String>,
}
