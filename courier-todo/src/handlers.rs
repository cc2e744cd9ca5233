//! Handlers for the todo commands and queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use courier_core::{CourierResult, Todo, TodoStats, TodoView};
use courier_dispatch::{CommandHandler, QueryHandler};
use courier_storage::Repository;

use crate::commands::{CreateTodo, DeleteTodo, MarkTodoCompleted, UpdateTodo};
use crate::queries::{GetAllTodos, GetTodoById, GetTodoStats, GetTodosByPriority};

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

pub struct CreateTodoHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl CreateTodoHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<CreateTodo> for CreateTodoHandler {
    async fn handle(&self, command: CreateTodo) -> CourierResult<()> {
        let todo = Todo::new(command.title, command.description, command.priority);
        self.repository.add(todo).await?;
        Ok(())
    }
}

pub struct UpdateTodoHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl UpdateTodoHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<UpdateTodo> for UpdateTodoHandler {
    async fn handle(&self, command: UpdateTodo) -> CourierResult<()> {
        // Unknown ids are a no-op rather than an error; the collection may
        // have changed underneath an offline client.
        let Some(mut todo) = self.repository.get(command.id).await? else {
            return Ok(());
        };

        todo.title = command.title;
        todo.description = command.description;
        todo.priority = command.priority;
        if command.is_completed && !todo.is_completed {
            todo.completed_at = Some(Utc::now());
        } else if !command.is_completed {
            todo.completed_at = None;
        }
        todo.is_completed = command.is_completed;

        self.repository.update(todo).await?;
        Ok(())
    }
}

pub struct DeleteTodoHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl DeleteTodoHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<DeleteTodo> for DeleteTodoHandler {
    async fn handle(&self, command: DeleteTodo) -> CourierResult<()> {
        self.repository.delete(command.id).await?;
        Ok(())
    }
}

pub struct MarkTodoCompletedHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl MarkTodoCompletedHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<MarkTodoCompleted> for MarkTodoCompletedHandler {
    async fn handle(&self, command: MarkTodoCompleted) -> CourierResult<()> {
        if let Some(mut todo) = self.repository.get(command.id).await? {
            todo.is_completed = true;
            todo.completed_at = Some(Utc::now());
            self.repository.update(todo).await?;
        }
        Ok(())
    }
}

// ============================================================================
// QUERY HANDLERS
// ============================================================================

pub struct GetAllTodosHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl GetAllTodosHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetAllTodos> for GetAllTodosHandler {
    async fn handle(&self, query: GetAllTodos) -> CourierResult<Vec<TodoView>> {
        let todos = self.repository.list().await?;
        Ok(todos
            .into_iter()
            .filter(|todo| query.include_completed || !todo.is_completed)
            .filter(|todo| {
                query
                    .priority_filter
                    .map_or(true, |priority| todo.priority == priority)
            })
            .map(TodoView::from)
            .collect())
    }
}

pub struct GetTodoByIdHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl GetTodoByIdHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetTodoById> for GetTodoByIdHandler {
    async fn handle(&self, query: GetTodoById) -> CourierResult<Option<TodoView>> {
        Ok(self.repository.get(query.id).await?.map(TodoView::from))
    }
}

pub struct GetTodosByPriorityHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl GetTodosByPriorityHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetTodosByPriority> for GetTodosByPriorityHandler {
    async fn handle(&self, query: GetTodosByPriority) -> CourierResult<Vec<TodoView>> {
        let todos = self.repository.list().await?;
        Ok(todos
            .into_iter()
            .filter(|todo| todo.priority == query.priority)
            .map(TodoView::from)
            .collect())
    }
}

pub struct GetTodoStatsHandler {
    repository: Arc<dyn Repository<Todo>>,
}

impl GetTodoStatsHandler {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }
}

fn collect_stats(todos: &[Todo]) -> TodoStats {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.is_completed).count();
    let mut by_priority = BTreeMap::new();
    for todo in todos {
        *by_priority.entry(todo.priority).or_insert(0) += 1;
    }
    TodoStats {
        total,
        completed,
        pending: total - completed,
        completion_rate: if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        by_priority,
    }
}

#[async_trait]
impl QueryHandler<GetTodoStats> for GetTodoStatsHandler {
    async fn handle(&self, _query: GetTodoStats) -> CourierResult<TodoStats> {
        let todos = self.repository.list().await?;
        Ok(collect_stats(&todos))
    }
}
