//! Todo queries. Each declares the key its result is cached under; the
//! cache's default expiration applies unless a query says otherwise.

use std::time::Duration;

use courier_core::{Priority, TodoStats, TodoView};
use courier_dispatch::Query;
use uuid::Uuid;

use crate::keys;

/// List todos, optionally hiding completed ones or filtering by priority.
#[derive(Debug, Clone)]
pub struct GetAllTodos {
    pub include_completed: bool,
    pub priority_filter: Option<Priority>,
}

impl Default for GetAllTodos {
    fn default() -> Self {
        Self {
            include_completed: true,
            priority_filter: None,
        }
    }
}

impl Query for GetAllTodos {
    type Output = Vec<TodoView>;
    const NAME: &'static str = "GetAllTodos";

    fn cache_key(&self) -> Option<String> {
        Some(keys::all_todos(self.include_completed, self.priority_filter))
    }
}

/// Fetch one todo by id.
#[derive(Debug, Clone)]
pub struct GetTodoById {
    pub id: Uuid,
}

impl GetTodoById {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Query for GetTodoById {
    type Output = Option<TodoView>;
    const NAME: &'static str = "GetTodoById";

    fn cache_key(&self) -> Option<String> {
        Some(keys::todo_by_id(self.id))
    }
}

/// List todos with exactly the given priority.
#[derive(Debug, Clone)]
pub struct GetTodosByPriority {
    pub priority: Priority,
}

impl GetTodosByPriority {
    pub fn new(priority: Priority) -> Self {
        Self { priority }
    }
}

impl Query for GetTodosByPriority {
    type Output = Vec<TodoView>;
    const NAME: &'static str = "GetTodosByPriority";

    fn cache_key(&self) -> Option<String> {
        Some(keys::todos_by_priority(self.priority))
    }
}

/// Aggregate statistics over the whole collection.
///
/// Stats go stale with every mutation, so they get a shorter expiration
/// than the lists.
#[derive(Debug, Clone, Default)]
pub struct GetTodoStats;

impl Query for GetTodoStats {
    type Output = TodoStats;
    const NAME: &'static str = "GetTodoStats";

    fn cache_key(&self) -> Option<String> {
        Some(keys::todo_stats())
    }

    fn cache_ttl(&self) -> Option<Duration> {
        Some(Duration::from_secs(60))
    }
}
