//! Test suite for repsheet-genai
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! Shared test infrastructure:
//! - Scripted in-process text providers
//! - Voting record fixtures and prompt templates
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that verify component interactions:
//! - Generation cache on a local filesystem store
//! - Gateway caching, retries and batch jobs
//! - The member pipeline end to end
//! - Provider clients against a mock HTTP server
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test
//!
//! # Run only unit tests
//! cargo test --lib
//!
//! # Run integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;
