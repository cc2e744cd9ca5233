//! Handler traits. Exactly one handler serves each request type.

use async_trait::async_trait;
use courier_core::CourierResult;

use crate::request::{Command, Query, ReturningCommand};

/// Executes one command type.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> CourierResult<()>;
}

/// Executes one query type, producing its declared output.
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, query: Q) -> CourierResult<Q::Output>;
}

/// Executes one result-returning command type.
#[async_trait]
pub trait ReturningCommandHandler<C: ReturningCommand>: Send + Sync {
    async fn handle(&self, command: C) -> CourierResult<C::Output>;
}
