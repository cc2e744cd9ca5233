//! Handler registry: one handler per request type, frozen at build time.

use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use courier_core::DispatchError;

use crate::handler::{CommandHandler, QueryHandler, ReturningCommandHandler};
use crate::request::{Command, Query, ReturningCommand};

struct Registration {
    request: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Maps request types to their sole handler.
///
/// Handlers are stored type-erased and recovered by downcast keyed on the
/// request's `TypeId`; the typed `insert_*`/`*_handler` methods are the
/// only way in or out, so the erasure never leaks.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    commands: HashMap<TypeId, Registration>,
    queries: HashMap<TypeId, Registration>,
    returning: HashMap<TypeId, Registration>,
}

fn insert_unique(
    map: &mut HashMap<TypeId, Registration>,
    type_id: TypeId,
    request: &'static str,
    handler: Box<dyn Any + Send + Sync>,
) -> Result<(), DispatchError> {
    match map.entry(type_id) {
        Entry::Occupied(_) => Err(DispatchError::DuplicateHandler { request }),
        Entry::Vacant(slot) => {
            slot.insert(Registration { request, handler });
            Ok(())
        }
    }
}

fn lookup<H: Clone + 'static>(
    map: &HashMap<TypeId, Registration>,
    type_id: TypeId,
    request: &'static str,
) -> Result<H, DispatchError> {
    map.get(&type_id)
        .and_then(|registration| registration.handler.downcast_ref::<H>())
        .cloned()
        .ok_or(DispatchError::HandlerNotFound { request })
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_command<C: Command>(
        &mut self,
        handler: Arc<dyn CommandHandler<C>>,
    ) -> Result<(), DispatchError> {
        insert_unique(
            &mut self.commands,
            TypeId::of::<C>(),
            C::NAME,
            Box::new(handler),
        )
    }

    pub(crate) fn insert_query<Q: Query>(
        &mut self,
        handler: Arc<dyn QueryHandler<Q>>,
    ) -> Result<(), DispatchError> {
        insert_unique(
            &mut self.queries,
            TypeId::of::<Q>(),
            Q::NAME,
            Box::new(handler),
        )
    }

    pub(crate) fn insert_returning_command<C: ReturningCommand>(
        &mut self,
        handler: Arc<dyn ReturningCommandHandler<C>>,
    ) -> Result<(), DispatchError> {
        insert_unique(
            &mut self.returning,
            TypeId::of::<C>(),
            C::NAME,
            Box::new(handler),
        )
    }

    pub(crate) fn command_handler<C: Command>(
        &self,
    ) -> Result<Arc<dyn CommandHandler<C>>, DispatchError> {
        lookup(&self.commands, TypeId::of::<C>(), C::NAME)
    }

    pub(crate) fn query_handler<Q: Query>(
        &self,
    ) -> Result<Arc<dyn QueryHandler<Q>>, DispatchError> {
        lookup(&self.queries, TypeId::of::<Q>(), Q::NAME)
    }

    pub(crate) fn returning_command_handler<C: ReturningCommand>(
        &self,
    ) -> Result<Arc<dyn ReturningCommandHandler<C>>, DispatchError> {
        lookup(&self.returning, TypeId::of::<C>(), C::NAME)
    }

    /// Names of every registered request type, for diagnostics.
    pub(crate) fn registered_requests(&self) -> Vec<&'static str> {
        self.commands
            .values()
            .chain(self.queries.values())
            .chain(self.returning.values())
            .map(|registration| registration.request)
            .collect()
    }
}
