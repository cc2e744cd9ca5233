//! COURIER App - Wiring
//!
//! Assembles the full object graph: store, repository, cache, outbox,
//! synchronizer, and a mediator with every handler and behavior
//! registered. The host chooses the store backend (memory for a session,
//! [`courier_storage::JsonFileStore`] for durability) and the sync client;
//! everything else is fixed here.

pub mod json;
mod telemetry;

use std::sync::Arc;

use courier_core::{CourierResult, Todo};
use courier_dispatch::{
    CommandCacheInvalidation, CommandOutboxBehavior, Mediator, MediatorBuilder,
    QueryCachingBehavior,
};
use courier_storage::{
    CommandOutbox, LocalStore, MemoryCache, Repository, StoreOutbox, StoreRepository,
};
use courier_sync::{SyncClient, Synchronizer};
use courier_todo::{
    CreateTodo, CreateTodoHandler, DeleteTodo, DeleteTodoHandler, GetAllTodos, GetAllTodosHandler,
    GetTodoById, GetTodoByIdHandler, GetTodoStats, GetTodoStatsHandler, GetTodosByPriority,
    GetTodosByPriorityHandler, MarkTodoCompleted, MarkTodoCompletedHandler, UpdateTodo,
    UpdateTodoHandler,
};

use crate::json::{SimplifyJson, SimplifyJsonHandler};

pub use telemetry::init_tracing;

/// Store key under which the todo collection lives.
pub const TODOS_STORAGE_KEY: &str = "todos";

/// The assembled application graph.
pub struct App {
    pub mediator: Arc<Mediator>,
    pub cache: Arc<MemoryCache>,
    pub repository: Arc<dyn Repository<Todo>>,
    pub outbox: Arc<dyn CommandOutbox>,
    pub synchronizer: Arc<Synchronizer>,
}

/// Build the application on top of the given store and sync client.
///
/// Command behaviors run invalidation outermost and the outbox innermost,
/// so a successful handler enqueues its record and then drops the stale
/// cache keys. Queries get the caching behavior.
pub fn build_app(
    store: Arc<dyn LocalStore>,
    sync_client: Arc<dyn SyncClient>,
) -> CourierResult<App> {
    let cache = Arc::new(MemoryCache::new());
    let repository: Arc<dyn Repository<Todo>> = Arc::new(StoreRepository::<Todo>::new(
        store.clone(),
        TODOS_STORAGE_KEY,
    ));
    let outbox: Arc<dyn CommandOutbox> = Arc::new(StoreOutbox::new(store));
    let synchronizer = Arc::new(Synchronizer::new(outbox.clone(), sync_client));

    let mediator = MediatorBuilder::new()
        .command_behavior(Arc::new(CommandCacheInvalidation::new(cache.clone())))
        .command_behavior(Arc::new(CommandOutboxBehavior::new(outbox.clone())))
        .query_behavior(Arc::new(QueryCachingBehavior::new(cache.clone())))
        .register_command::<CreateTodo, _>(CreateTodoHandler::new(repository.clone()))?
        .register_command::<UpdateTodo, _>(UpdateTodoHandler::new(repository.clone()))?
        .register_command::<DeleteTodo, _>(DeleteTodoHandler::new(repository.clone()))?
        .register_command::<MarkTodoCompleted, _>(MarkTodoCompletedHandler::new(
            repository.clone(),
        ))?
        .register_query::<GetAllTodos, _>(GetAllTodosHandler::new(repository.clone()))?
        .register_query::<GetTodoById, _>(GetTodoByIdHandler::new(repository.clone()))?
        .register_query::<GetTodosByPriority, _>(GetTodosByPriorityHandler::new(
            repository.clone(),
        ))?
        .register_query::<GetTodoStats, _>(GetTodoStatsHandler::new(repository.clone()))?
        .register_query::<SimplifyJson, _>(SimplifyJsonHandler)?
        .build();

    tracing::info!(
        requests = mediator.registered_requests().len(),
        "application wired"
    );

    Ok(App {
        mediator: Arc::new(mediator),
        cache,
        repository,
        outbox,
        synchronizer,
    })
}
