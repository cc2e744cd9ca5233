//! Todo commands. Each declares the cache keys it makes stale; validation
//! is the caller's step before dispatch.

use courier_core::{Priority, ValidationError};
use courier_dispatch::Command;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn validate_text(title: &str, description: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "title".to_string(),
        });
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::InvalidValue {
            field: "title".to_string(),
            reason: format!("must be at most {MAX_TITLE_LEN} characters"),
        });
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::InvalidValue {
            field: "description".to_string(),
            reason: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        });
    }
    Ok(())
}

/// Create a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.description)
    }
}

impl Command for CreateTodo {
    const NAME: &'static str = "CreateTodo";

    fn invalidates(&self) -> Vec<String> {
        keys::invalidation_keys(None)
    }
}

/// Replace a todo's editable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
}

impl UpdateTodo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.description)
    }
}

impl Command for UpdateTodo {
    const NAME: &'static str = "UpdateTodo";

    fn invalidates(&self) -> Vec<String> {
        keys::invalidation_keys(Some(self.id))
    }
}

/// Delete a todo by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodo {
    pub id: Uuid,
}

impl DeleteTodo {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Command for DeleteTodo {
    const NAME: &'static str = "DeleteTodo";

    fn invalidates(&self) -> Vec<String> {
        keys::invalidation_keys(Some(self.id))
    }
}

/// Mark a todo as completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkTodoCompleted {
    pub id: Uuid,
}

impl MarkTodoCompleted {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Command for MarkTodoCompleted {
    const NAME: &'static str = "MarkTodoCompleted";

    fn invalidates(&self) -> Vec<String> {
        keys::invalidation_keys(Some(self.id))
    }
}
