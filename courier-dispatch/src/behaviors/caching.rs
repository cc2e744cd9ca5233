//! Query caching behavior.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::CourierResult;
use courier_storage::{Cache, CachedValue};

use crate::behavior::{boxed, Next, QueryBehavior, QueryDescriptor};

/// Serves cacheable queries from the cache, falling back to the handler.
///
/// Queries that declare no key pass straight through. For a declared key,
/// a hit returns the cached value without invoking the handler; a miss
/// runs the continuation and stores the result under the key with the
/// query's declared expiration (or the cache default).
pub struct QueryCachingBehavior {
    cache: Arc<dyn Cache>,
}

impl QueryCachingBehavior {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl QueryBehavior for QueryCachingBehavior {
    async fn handle(
        &self,
        query: &QueryDescriptor,
        next: Next<'_, CachedValue>,
    ) -> CourierResult<CachedValue> {
        let Some(key) = query.cache_key.as_deref() else {
            return next.run().await;
        };
        self.cache
            .get_or_add(key, Box::new(move || boxed(next.run())), query.cache_ttl)
            .await
    }
}
