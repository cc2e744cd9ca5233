//! The mediator: single dispatch point decoupling callers from handlers.

use std::sync::Arc;

use courier_core::{CacheError, CourierResult, DispatchError};
use courier_storage::CachedValue;

use crate::behavior::{
    boxed, BehaviorFuture, CommandBehavior, CommandDescriptor, Next, QueryBehavior,
    QueryDescriptor,
};
use crate::handler::{CommandHandler, QueryHandler, ReturningCommandHandler};
use crate::registry::HandlerRegistry;
use crate::request::{Command, Query, ReturningCommand};

fn run_command_chain<'a>(
    behaviors: &'a [Arc<dyn CommandBehavior>],
    descriptor: &'a CommandDescriptor,
    terminal: Next<'a, ()>,
) -> BehaviorFuture<'a, ()> {
    match behaviors.split_first() {
        None => boxed(terminal.run()),
        Some((outer, rest)) => boxed(async move {
            let next = Next::new(move || run_command_chain(rest, descriptor, terminal));
            outer.handle(descriptor, next).await
        }),
    }
}

fn run_query_chain<'a>(
    behaviors: &'a [Arc<dyn QueryBehavior>],
    descriptor: &'a QueryDescriptor,
    terminal: Next<'a, CachedValue>,
) -> BehaviorFuture<'a, CachedValue> {
    match behaviors.split_first() {
        None => boxed(terminal.run()),
        Some((outer, rest)) => boxed(async move {
            let next = Next::new(move || run_query_chain(rest, descriptor, terminal));
            outer.handle(descriptor, next).await
        }),
    }
}

/// Builds a [`Mediator`]: explicit handler registration plus the ordered
/// behavior lists. Registration happens exactly once; a second handler for
/// the same request type fails immediately.
#[derive(Default)]
pub struct MediatorBuilder {
    registry: HandlerRegistry,
    command_behaviors: Vec<Arc<dyn CommandBehavior>>,
    query_behaviors: Vec<Arc<dyn QueryBehavior>>,
}

impl std::fmt::Debug for MediatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorBuilder")
            .field("command_behaviors", &self.command_behaviors.len())
            .field("query_behaviors", &self.query_behaviors.len())
            .finish()
    }
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            command_behaviors: Vec::new(),
            query_behaviors: Vec::new(),
        }
    }

    pub fn register_command<C, H>(mut self, handler: H) -> Result<Self, DispatchError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        self.registry.insert_command::<C>(Arc::new(handler))?;
        Ok(self)
    }

    pub fn register_query<Q, H>(mut self, handler: H) -> Result<Self, DispatchError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        self.registry.insert_query::<Q>(Arc::new(handler))?;
        Ok(self)
    }

    pub fn register_returning_command<C, H>(mut self, handler: H) -> Result<Self, DispatchError>
    where
        C: ReturningCommand,
        H: ReturningCommandHandler<C> + 'static,
    {
        self.registry.insert_returning_command::<C>(Arc::new(handler))?;
        Ok(self)
    }

    /// Append a command behavior. Behaviors run in registration order,
    /// first-registered outermost.
    pub fn command_behavior(mut self, behavior: Arc<dyn CommandBehavior>) -> Self {
        self.command_behaviors.push(behavior);
        self
    }

    /// Append a query behavior. Behaviors run in registration order,
    /// first-registered outermost.
    pub fn query_behavior(mut self, behavior: Arc<dyn QueryBehavior>) -> Self {
        self.query_behaviors.push(behavior);
        self
    }

    pub fn build(self) -> Mediator {
        Mediator {
            registry: self.registry,
            command_behaviors: self.command_behaviors,
            query_behaviors: self.query_behaviors,
        }
    }
}

/// Single entry point for submitting commands and queries.
///
/// The mediator owns no persistent state of its own: handlers and behaviors
/// are resolved from the frozen registry, and every error a handler or
/// behavior raises propagates to the caller unchanged.
pub struct Mediator {
    registry: HandlerRegistry,
    command_behaviors: Vec<Arc<dyn CommandBehavior>>,
    query_behaviors: Vec<Arc<dyn QueryBehavior>>,
}

impl Mediator {
    /// Dispatch a command through the behavior chain.
    pub async fn send<C: Command>(&self, command: C) -> CourierResult<()> {
        let handler = self.registry.command_handler::<C>()?;
        let payload =
            serde_json::to_value(&command).map_err(|err| DispatchError::EncodePayload {
                request: C::NAME,
                reason: err.to_string(),
            })?;
        let descriptor = CommandDescriptor {
            name: C::NAME,
            invalidates: command.invalidates(),
            payload,
        };
        let terminal = Next::new(move || boxed(async move { handler.handle(command).await }));
        run_command_chain(&self.command_behaviors, &descriptor, terminal).await
    }

    /// Dispatch a result-returning command directly to its handler,
    /// bypassing the behavior chain (see [`ReturningCommand`]).
    pub async fn send_returning<C: ReturningCommand>(
        &self,
        command: C,
    ) -> CourierResult<C::Output> {
        let handler = self.registry.returning_command_handler::<C>()?;
        handler.handle(command).await
    }

    /// Dispatch a query through the behavior chain and return its typed
    /// result.
    pub async fn query<Q: Query>(&self, query: Q) -> CourierResult<Q::Output> {
        let handler = self.registry.query_handler::<Q>()?;
        let descriptor = QueryDescriptor {
            name: Q::NAME,
            cache_key: query.cache_key(),
            cache_ttl: query.cache_ttl(),
        };
        let terminal = Next::new(move || {
            boxed(async move {
                let output = handler.handle(query).await?;
                Ok(Arc::new(output) as CachedValue)
            })
        });
        let value = run_query_chain(&self.query_behaviors, &descriptor, terminal).await?;
        match value.downcast::<Q::Output>() {
            Ok(output) => Ok(Q::Output::clone(&output)),
            Err(_) => Err(CacheError::TypeMismatch {
                key: descriptor.cache_key.unwrap_or_else(|| Q::NAME.to_string()),
            }
            .into()),
        }
    }

    /// Names of every registered request type, for diagnostics.
    pub fn registered_requests(&self) -> Vec<&'static str> {
        self.registry.registered_requests()
    }
}
