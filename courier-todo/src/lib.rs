//! COURIER Todo - The Todo Domain Module
//!
//! Commands, queries, and their handlers for the todo collection. Commands
//! declare the cache keys they invalidate; queries declare the keys they
//! are cached under. Handlers talk to a [`courier_storage::Repository`]
//! and never see the mediator or the behaviors around them.

mod commands;
mod handlers;
pub mod keys;
mod queries;

pub use commands::{CreateTodo, DeleteTodo, MarkTodoCompleted, UpdateTodo};
pub use handlers::{
    CreateTodoHandler, DeleteTodoHandler, GetAllTodosHandler, GetTodoByIdHandler,
    GetTodoStatsHandler, GetTodosByPriorityHandler, MarkTodoCompletedHandler, UpdateTodoHandler,
};
pub use queries::{GetAllTodos, GetTodoById, GetTodoStats, GetTodosByPriority};
