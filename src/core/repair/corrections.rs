//! Curated broken-link corrections
//!
//! Known model mistakes, mapped to their fix by manual inspection of
//! diagnostic dumps. A correction also rewrites any new mistake that happens
//! to share its text, so every firing is logged.

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Table format this build understands
pub const CORRECTIONS_VERSION: u32 = 1;

/// One substring replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCorrection {
    pub find: String,
    pub replace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Versioned correction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionTable {
    pub version: u32,
    #[serde(default)]
    pub corrections: Vec<LinkCorrection>,
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self {
            version: CORRECTIONS_VERSION,
            corrections: Vec::new(),
        }
    }
}

impl CorrectionTable {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load the table; a missing file means no corrections
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No correction table at {}, broken links will not be patched", path.display());
            return Ok(Self::default());
        }
        let table = Self::from_yaml(&std::fs::read_to_string(path)?)?;
        info!(
            "Loaded {} link corrections from {} (version {})",
            table.corrections.len(),
            path.display(),
            table.version
        );
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        if self.version != CORRECTIONS_VERSION {
            return Err(GatewayError::config(format!(
                "Unsupported correction table version {} (expected {})",
                self.version, CORRECTIONS_VERSION
            )));
        }
        if let Some(empty) = self.corrections.iter().position(|c| c.find.is_empty()) {
            return Err(GatewayError::config(format!(
                "Correction {} has an empty find string",
                empty
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Apply every correction in order. Returns the new text and how many
    /// corrections fired.
    pub fn apply(&self, text: &str, unit: &str) -> (String, usize) {
        let mut text = text.to_string();
        let mut fired = 0;
        for correction in &self.corrections {
            if text.contains(&correction.find) {
                warn!(
                    "Correcting {:?} -> {:?} in {}",
                    correction.find, correction.replace, unit
                );
                text = text.replace(&correction.find, &correction.replace);
                fired += 1;
            }
        }
        if fired == 0 {
            debug!("No link correction applies to {}", unit);
        }
        (text, fired)
    }
}
