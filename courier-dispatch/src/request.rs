//! Request contracts: commands mutate, queries read.

use std::time::Duration;

use serde::Serialize;

/// A request representing an intended state mutation.
///
/// Commands are serializable so the outbox behavior can persist them for
/// later synchronization. A command that should drop cache entries after a
/// successful run overrides [`Command::invalidates`]; the default declares
/// nothing and the invalidation behavior leaves the cache alone.
pub trait Command: Serialize + Send + Sync + 'static {
    /// Stable name used for handler diagnostics and outbox records.
    const NAME: &'static str;

    /// Cache keys to drop after this command commits.
    fn invalidates(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A request representing a read, parameterized by its result type.
///
/// A query that wants its result cached overrides [`Query::cache_key`]
/// (and optionally [`Query::cache_ttl`]; the cache's default expiration
/// applies otherwise). The default declares no key and the caching
/// behavior passes straight through to the handler.
pub trait Query: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Stable name used for handler diagnostics.
    const NAME: &'static str;

    /// Cache key for this query's result, if it should be cached.
    fn cache_key(&self) -> Option<String> {
        None
    }

    /// Expiration for the cached result. `None` means the cache default.
    fn cache_ttl(&self) -> Option<Duration> {
        None
    }
}

/// A command that produces a typed result.
///
/// Result-returning commands dispatch directly to their handler, outside
/// the behavior chain - they are neither cached, invalidating, nor
/// enqueued for sync. This mirrors the pipeline's original contract and is
/// a documented limitation, not an invitation to rely on it; a mutation
/// that must reach the outbox belongs on a plain [`Command`].
pub trait ReturningCommand: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Stable name used for handler diagnostics.
    const NAME: &'static str;
}
