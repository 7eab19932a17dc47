//! Integration tests for repsheet-genai
//!
//! These tests drive the cache, gateway, providers and pipeline together,
//! against a local mock server or scripted in-process providers.

pub mod cache_tests;
pub mod gateway_tests;
pub mod member_pipeline_tests;
pub mod provider_http_tests;
