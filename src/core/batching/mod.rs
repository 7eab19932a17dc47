//! Prompt batching
//!
//! A member's voting record is shuffled with a fixed seed and sliced into a
//! fixed number of batches, so re-runs render byte-identical prompts and hit
//! the generation cache.

pub mod partition;
pub mod template;


pub use partition::{SHUFFLE_SEED, batch_count_for, partition};
pub use template::{PromptLibrary, PromptTemplate, unresolved_placeholders};
