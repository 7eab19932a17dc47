//! Diagnostic dumps for terminal repair failures
//!
//! Operators read these to grow the correction table; nothing in the
//! pipeline reads them back.

use crate::core::types::ModelTier;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One terminal failure
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub timestamp: DateTime<Utc>,
    pub unit: String,
    pub tier: ModelTier,
    /// Cache key of the generation that produced `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broken_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Writes diagnostics as JSON files under a directory
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    dir: Option<PathBuf>,
}

impl DiagnosticSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A sink that only logs
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Write `diagnostic`, returning the file path when one was written.
    ///
    /// A failed write is logged and swallowed; the unit has already failed.
    pub async fn write(&self, diagnostic: &Diagnostic) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        match Self::write_to(dir, diagnostic).await {
            Ok(path) => {
                info!("Wrote diagnostic for {} to {}", diagnostic.unit, path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to write diagnostic for {}: {}", diagnostic.unit, e);
                None
            }
        }
    }

    async fn write_to(dir: &Path, diagnostic: &Diagnostic) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let name = format!(
            "{}-{}.json",
            file_stem(&diagnostic.unit),
            diagnostic.timestamp.format("%Y%m%dT%H%M%S%.3f")
        );
        let path = dir.join(name);
        tokio::fs::write(&path, serde_json::to_vec_pretty(diagnostic)?).await?;
        Ok(path)
    }
}

fn file_stem(unit: &str) -> String {
    unit.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
