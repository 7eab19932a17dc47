//! Utility modules
//!
//! - **error**: error types, retry policy and the admission bulkhead
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;
