//! The behavior chain: cross-cutting wrappers around handler execution.
//!
//! Behaviors compose in registration order, outermost first, each one
//! receiving a [`Next`] continuation that runs the remainder of the chain
//! with the handler invocation at the innermost position. Behaviors are
//! long-lived, process-wide singletons and must hold no per-call state;
//! everything call-scoped travels in the descriptor or the continuation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use courier_core::CourierResult;
use courier_storage::CachedValue;

/// Boxed future used throughout the chain.
pub type BehaviorFuture<'a, T> = Pin<Box<dyn Future<Output = CourierResult<T>> + Send + 'a>>;

/// Box a future into the chain's shape.
pub fn boxed<'a, T>(
    future: impl Future<Output = CourierResult<T>> + Send + 'a,
) -> BehaviorFuture<'a, T> {
    Box::pin(future)
}

/// Continuation handed to a behavior.
///
/// Invoking [`Next::run`] executes the rest of the chain; not invoking it
/// short-circuits the dispatch (which is how a cache hit skips the
/// handler). The before/after steps a behavior performs around `run`
/// execute in strict program order within one dispatch call.
pub struct Next<'a, T> {
    inner: Box<dyn FnOnce() -> BehaviorFuture<'a, T> + Send + 'a>,
}

impl<'a, T> Next<'a, T> {
    pub(crate) fn new<F>(inner: F) -> Self
    where
        F: FnOnce() -> BehaviorFuture<'a, T> + Send + 'a,
    {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Run the rest of the chain.
    pub async fn run(self) -> CourierResult<T> {
        (self.inner)().await
    }
}

/// What the command behaviors get to see of a command: its name, the cache
/// keys it declares for invalidation, and its serialized payload. The typed
/// command itself travels only through the innermost continuation.
pub struct CommandDescriptor {
    pub name: &'static str,
    pub invalidates: Vec<String>,
    pub payload: serde_json::Value,
}

/// What the query behaviors get to see of a query.
pub struct QueryDescriptor {
    pub name: &'static str,
    pub cache_key: Option<String>,
    pub cache_ttl: Option<Duration>,
}

/// Cross-cutting wrapper around a command execution.
#[async_trait]
pub trait CommandBehavior: Send + Sync {
    async fn handle(
        &self,
        command: &CommandDescriptor,
        next: Next<'_, ()>,
    ) -> CourierResult<()>;
}

/// Cross-cutting wrapper around a query execution.
///
/// Query results flow through the chain type-erased as [`CachedValue`] so
/// one behavior instance can serve every query type; the mediator downcasts
/// at the boundary.
#[async_trait]
pub trait QueryBehavior: Send + Sync {
    async fn handle(
        &self,
        query: &QueryDescriptor,
        next: Next<'_, CachedValue>,
    ) -> CourierResult<CachedValue>;
}
