//! COURIER Storage - Local Store, Repository, Cache, and Outbox
//!
//! The persistence collaborators of the dispatch core. Everything here is
//! keyed storage: a [`LocalStore`] holding JSON values, a flat-list
//! [`Repository`] and [`CommandOutbox`] on top of it, and an expiring
//! key-value [`cache`]. The dispatch layer only ever sees the traits; which
//! backend sits underneath (memory or files on disk) is wiring's choice.

pub mod cache;
mod outbox;
mod repository;
mod store;

pub use cache::{Cache, CacheFuture, CachedValue, MemoryCache, ValueFactory, DEFAULT_EXPIRATION};
pub use outbox::{CommandOutbox, StoreOutbox, OUTBOX_STORAGE_KEY};
pub use repository::{MemoryRepository, Repository, StoreRepository, StoredEntity};
pub use store::{JsonFileStore, LocalStore, LocalStoreExt, MemoryStore};
