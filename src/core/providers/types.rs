//! Batch job types shared by providers and the gateway

use super::error::ProviderError;
use crate::core::types::GenerationRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of a provider-side batch job.
///
/// `key` is the cache key of `request` and travels with the unit through
/// the provider, so results can be matched back without in-memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub key: String,
    pub request: GenerationRequest,
}

/// Lifecycle of a provider-side batch job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Expired,
    /// A state this client does not recognise. Treated as a failed end so
    /// polling stops and units take the synchronous path.
    Unknown(String),
}

impl BatchState {
    /// Whether the job is over as far as polling is concerned
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Expired => write!(f, "expired"),
            Self::Unknown(state) => write!(f, "unknown ({})", state),
        }
    }
}

/// Handle on a submitted batch job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub name: String,
    pub state: BatchState,
}

/// Outcome of one unit once the job has ended
#[derive(Debug)]
pub struct BatchItemResult {
    pub key: String,
    pub outcome: Result<Option<String>, ProviderError>,
}
