//! The three concrete pipeline behaviors.

mod caching;
mod invalidate;
mod outbox;

pub use caching::QueryCachingBehavior;
pub use invalidate::CommandCacheInvalidation;
pub use outbox::CommandOutboxBehavior;
