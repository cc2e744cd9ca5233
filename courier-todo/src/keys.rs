//! Cache-key scheme for the todo module.
//!
//! Keys are flat strings with `:`-separated segments. List keys encode the
//! query's filter parameters so each filter combination caches separately;
//! `invalidation_keys` enumerates every variant a mutation could have made
//! stale.

use courier_core::Priority;
use uuid::Uuid;

/// Key for [`crate::GetAllTodos`] with the given filters.
pub fn all_todos(include_completed: bool, priority: Option<Priority>) -> String {
    match priority {
        Some(priority) => format!("todos:all:{include_completed}:{priority}"),
        None => format!("todos:all:{include_completed}:all"),
    }
}

/// Key for [`crate::GetTodoById`].
pub fn todo_by_id(id: Uuid) -> String {
    format!("todos:id:{id}")
}

/// Key for [`crate::GetTodosByPriority`].
pub fn todos_by_priority(priority: Priority) -> String {
    format!("todos:priority:{priority}")
}

/// Key for [`crate::GetTodoStats`].
pub fn todo_stats() -> String {
    "todos:stats".to_string()
}

/// Every key a mutation invalidates: all list-key variants, the by-priority
/// keys, the stats key, and - when the mutation targets one todo - its
/// by-id key.
pub fn invalidation_keys(id: Option<Uuid>) -> Vec<String> {
    let mut keys = Vec::new();
    for include_completed in [true, false] {
        keys.push(all_todos(include_completed, None));
        for priority in Priority::ALL {
            keys.push(all_todos(include_completed, Some(priority)));
        }
    }
    for priority in Priority::ALL {
        keys.push(todos_by_priority(priority));
    }
    keys.push(todo_stats());
    if let Some(id) = id {
        keys.push(todo_by_id(id));
    }
    keys
}
