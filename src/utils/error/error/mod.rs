//! Error handling for the pipeline
//!
//! This module defines the crate-wide error type.

mod helpers;
mod types;

pub use types::{GatewayError, Result};
