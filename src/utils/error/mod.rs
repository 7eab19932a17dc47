//! Error Handling utilities
//!
//! This module provides the crate error type plus retry and admission-control
//! helpers.

pub mod error;
pub mod recovery;

pub use error::*;
pub use recovery::*;
