//! COURIER Core - Entity Types and Errors
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains only data types, projections between them, and the
//! error taxonomy - no dispatch, storage, or sync logic.

mod error;
mod outbox;
mod todo;

pub use error::{
    CacheError, CourierError, CourierResult, DispatchError, StorageError, SyncError,
    ValidationError,
};
pub use outbox::PendingCommand;
pub use todo::{Priority, Todo, TodoStats, TodoView};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 entity id (timestamp-sortable).
pub fn new_entity_id() -> Uuid {
    Uuid::now_v7()
}
