//! Expiring key-value cache.
//!
//! The cache holds type-erased values under string keys, each with an
//! absolute expiration measured from insertion. A present, unexpired entry
//! is always preferred over recomputation; an absent or expired entry
//! triggers the supplied factory. Concurrent callers for the same missing
//! key share a single factory run through a per-key in-flight guard, so a
//! value is computed at most once per key at a time.

mod memory;
mod traits;

pub use memory::{MemoryCache, DEFAULT_EXPIRATION};
pub use traits::{Cache, CacheFuture, CachedValue, ValueFactory};
