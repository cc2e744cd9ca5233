//! Command outbox-sync behavior.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::{CourierResult, PendingCommand};
use courier_storage::CommandOutbox;

use crate::behavior::{CommandBehavior, CommandDescriptor, Next};

/// Enqueues a serialized copy of every successful command for remote sync.
///
/// The handler runs first; a failed handler enqueues nothing. An enqueue
/// failure propagates from the dispatch even though the handler's local
/// side effect has already committed - callers must treat that as a
/// partial-failure state needing reconciliation.
pub struct CommandOutboxBehavior {
    outbox: Arc<dyn CommandOutbox>,
}

impl CommandOutboxBehavior {
    pub fn new(outbox: Arc<dyn CommandOutbox>) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl CommandBehavior for CommandOutboxBehavior {
    async fn handle(
        &self,
        command: &CommandDescriptor,
        next: Next<'_, ()>,
    ) -> CourierResult<()> {
        next.run().await?;

        let record = PendingCommand::new(command.name, command.payload.clone());
        self.outbox.enqueue(record).await
    }
}
