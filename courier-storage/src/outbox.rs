//! Durable queue of commands awaiting remote synchronization.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::{CourierResult, PendingCommand};
use uuid::Uuid;

use crate::store::{LocalStore, LocalStoreExt};

/// Store key under which the pending-command list lives.
pub const OUTBOX_STORAGE_KEY: &str = "pending-commands";

/// Append-only (until synced) queue of pending commands.
#[async_trait]
pub trait CommandOutbox: Send + Sync {
    /// Append a record. Every call adds a new record, even for logically
    /// identical commands.
    async fn enqueue(&self, record: PendingCommand) -> CourierResult<()>;

    /// All pending records in insertion order, oldest first.
    async fn list_all(&self) -> CourierResult<Vec<PendingCommand>>;

    /// Delete a record by id. Idempotent.
    async fn remove(&self, id: Uuid) -> CourierResult<()>;
}

/// Outbox persisting its records as one flat list in a [`LocalStore`].
pub struct StoreOutbox {
    store: Arc<dyn LocalStore>,
}

impl StoreOutbox {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandOutbox for StoreOutbox {
    async fn enqueue(&self, record: PendingCommand) -> CourierResult<()> {
        let mut records = self.list_all().await?;
        records.push(record);
        self.store.save_as(OUTBOX_STORAGE_KEY, &records).await
    }

    async fn list_all(&self) -> CourierResult<Vec<PendingCommand>> {
        Ok(self
            .store
            .load_as::<Vec<PendingCommand>>(OUTBOX_STORAGE_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn remove(&self, id: Uuid) -> CourierResult<()> {
        let mut records = self.list_all().await?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() != before {
            self.store.save_as(OUTBOX_STORAGE_KEY, &records).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn outbox() -> StoreOutbox {
        StoreOutbox::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn records_come_back_in_insertion_order() {
        let outbox = outbox();
        for index in 0..3 {
            outbox
                .enqueue(PendingCommand::new("Sample", json!({ "index": index })))
                .await
                .unwrap();
        }
        let records = outbox.list_all().await.unwrap();
        let indices: Vec<i64> = records
            .iter()
            .map(|record| record.payload["index"].as_i64().unwrap())
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn identical_commands_are_not_deduplicated() {
        let outbox = outbox();
        let payload = json!({ "title": "same" });
        outbox
            .enqueue(PendingCommand::new("Sample", payload.clone()))
            .await
            .unwrap();
        outbox
            .enqueue(PendingCommand::new("Sample", payload))
            .await
            .unwrap();
        assert_eq!(outbox.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let outbox = outbox();
        let record = PendingCommand::new("Sample", json!({}));
        let id = record.id;
        outbox.enqueue(record).await.unwrap();

        outbox.remove(id).await.unwrap();
        outbox.remove(id).await.unwrap();
        assert!(outbox.list_all().await.unwrap().is_empty());
    }
}
