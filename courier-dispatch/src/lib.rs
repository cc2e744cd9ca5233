//! COURIER Dispatch - Mediator, Handler Registry, and Pipeline Behaviors
//!
//! The single entry point callers use to submit commands and queries. The
//! [`Mediator`] resolves the registered handler for a request's type, wraps
//! the invocation in an ordered chain of cross-cutting behaviors (query
//! caching, cache invalidation, outbox enqueueing), and returns the result.
//! Handlers never see the behaviors wrapping them.
//!
//! Registration is explicit and happens once, through [`MediatorBuilder`];
//! the built mediator is immutable and lookups are read-only. Registering
//! two handlers for one request type is a configuration error surfaced at
//! build time, not a silent last-wins.

mod behavior;
mod behaviors;
mod handler;
mod mediator;
mod registry;
mod request;

pub use behavior::{
    boxed, BehaviorFuture, CommandBehavior, CommandDescriptor, Next, QueryBehavior,
    QueryDescriptor,
};
pub use behaviors::{CommandCacheInvalidation, CommandOutboxBehavior, QueryCachingBehavior};
pub use handler::{CommandHandler, QueryHandler, ReturningCommandHandler};
pub use mediator::{Mediator, MediatorBuilder};
pub use request::{Command, Query, ReturningCommand};
