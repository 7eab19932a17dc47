//! # repsheet-genai
//!
//! Cached, budget-aware LLM summarization of Canadian parliamentary voting
//! records.
//!
//! Members' voting records are split into deterministic batches, summarized
//! by a low-cost model, validated and repaired (escalating to a high-cost
//! model when needed) and merged into one summary per member. Every model
//! call goes through a content-addressed cache, so re-running a finished
//! member costs nothing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use repsheet_genai::{AppConfig, Pipeline, SummarizeOptions};
//! use std::collections::BTreeMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load(None)?;
//!     let pipeline = Pipeline::from_config(&config).await?;
//!
//!     let members = BTreeMap::new();
//!     let report = pipeline
//!         .members
//!         .summarize_members(&members, &SummarizeOptions::default())
//!         .await?;
//!     println!("{} members failed", report.failed.len());
//!
//!     pipeline.gateway.cache().flush().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::AppConfig;
pub use utils::error::{GatewayError, Result};

pub use core::batching::{PromptLibrary, PromptTemplate, partition};
pub use core::cache::{CacheKey, CacheMode, GenerationCache, derive_key};
pub use core::gateway::{BatchCollection, Gateway, GenerateOptions};
pub use core::providers::{AnthropicClient, GeminiClient, ProviderError, TextProvider};
pub use core::repair::{CorrectionTable, DiagnosticSink, RepairFailure, SummaryRepairer, broken_bill_links};
pub use core::summarize::{
    BillRunReport, BillSummarizer, MemberRunReport, MemberSummarizer, Pipeline, SummarizeOptions,
};
pub use core::types::{
    BillId, BillSummary, BillVotingRecord, GenerationRequest, MemberSummary, ModelTier,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
