//! Summarization configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for prompt batching, repair and the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    /// Directory holding `<template>/001.txt` prompt files
    pub prompts_dir: PathBuf,
    /// Total tokens one member's batched summaries may produce
    pub token_budget: u32,
    /// Output tokens a single model call may produce
    pub output_token_ceiling: u32,
    /// Seed for the voting record shuffle
    pub shuffle_seed: u64,
    /// Extra quality-tier attempts, each bypassing the cache
    pub quality_retries: u32,
    /// Versioned broken-link correction table
    pub corrections_path: PathBuf,
    /// Where terminal repair failures are dumped
    pub diagnostics_dir: PathBuf,
    /// Submit member batch prompts as one provider-side job
    pub use_batch_api: bool,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from("prompts"),
            token_budget: 200_000,
            output_token_ceiling: default_output_token_ceiling(),
            shuffle_seed: 338,
            quality_retries: 2,
            corrections_path: PathBuf::from("config/link_corrections.yaml"),
            diagnostics_dir: PathBuf::from("debug"),
            use_batch_api: false,
        }
    }
}

impl SummarizationConfig {
    /// Number of batches a voting record is split into
    pub fn batch_count(&self) -> usize {
        crate::core::batching::batch_count_for(self.token_budget, self.output_token_ceiling)
    }
}
