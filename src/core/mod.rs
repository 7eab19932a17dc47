//! Core functionality of the summarization pipeline
//!
//! Leaves first: domain types, the generation cache, provider clients, the
//! gateway over them, prompt batching, output repair and the orchestrator.

pub mod batching;
pub mod cache;
pub mod gateway;
pub mod providers;
pub mod repair;
pub mod summarize;
pub mod types;
