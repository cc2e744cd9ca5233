//! Cache trait and the type-erased value it stores.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_core::CourierResult;

/// A cached value. Values are type-erased so one cache can hold the results
/// of queries with different output types; callers downcast on the way out.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Future produced by a cache factory.
pub type CacheFuture<'a> = Pin<Box<dyn Future<Output = CourierResult<CachedValue>> + Send + 'a>>;

/// Factory invoked on a cache miss to produce the value to store.
pub type ValueFactory<'a> = Box<dyn FnOnce() -> CacheFuture<'a> + Send + 'a>;

/// Async key-value cache with per-entry expiration.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Return the cached value under `key` if present and unexpired;
    /// otherwise run `factory`, store its result under `key` with the given
    /// expiration (or the cache's default), and return it.
    ///
    /// Factory errors propagate and nothing is cached on failure.
    async fn get_or_add<'a>(
        &self,
        key: &str,
        factory: ValueFactory<'a>,
        expiration: Option<Duration>,
    ) -> CourierResult<CachedValue>;

    /// Drop the entry under `key`. Idempotent; absent keys are fine.
    async fn remove(&self, key: &str) -> CourierResult<()>;
}
