//! Content-addressed generation cache
//!
//! Values are keyed by an MD5 digest of a canonical request descriptor,
//! serialized, LZMA-compressed and written to an object store.

pub mod backend;
pub mod codec;
pub mod key;
pub mod store;


pub use codec::CacheMode;
pub use key::{CacheKey, ResolvedKey, derive_key};
pub use store::{CacheStats, GenerationCache};
