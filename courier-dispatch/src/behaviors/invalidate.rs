//! Command cache-invalidation behavior.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::CourierResult;
use courier_storage::Cache;

use crate::behavior::{CommandBehavior, CommandDescriptor, Next};

/// Drops a command's declared cache keys after the handler succeeds.
///
/// The handler runs first; if it fails, invalidation is skipped entirely
/// and the error propagates unchanged. Removal is best-effort - keys that
/// were never cached are fine.
pub struct CommandCacheInvalidation {
    cache: Arc<dyn Cache>,
}

impl CommandCacheInvalidation {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CommandBehavior for CommandCacheInvalidation {
    async fn handle(
        &self,
        command: &CommandDescriptor,
        next: Next<'_, ()>,
    ) -> CourierResult<()> {
        next.run().await?;

        for key in &command.invalidates {
            self.cache.remove(key).await?;
        }
        if !command.invalidates.is_empty() {
            tracing::debug!(
                command = command.name,
                keys = command.invalidates.len(),
                "dropped cache entries after command"
            );
        }
        Ok(())
    }
}
