//! Error recovery and resilience utilities
//!
//! Retry with exponential backoff and the admission-control bulkhead used by
//! the generation gateway.

mod resilience;
mod retry;
mod types;

pub use resilience::Bulkhead;
pub use retry::RetryPolicy;
pub use types::RetryConfig;
