//! The outbox drain loop.

use std::sync::Arc;

use courier_core::CourierResult;
use courier_storage::CommandOutbox;
use tokio::sync::Mutex;

use crate::client::SyncClient;

/// Outcome of one sync attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pending records at the start of the drain.
    pub attempted: usize,
    /// Records the remote system confirmed and that were removed.
    pub accepted: usize,
    /// Records left queued after a failed push.
    pub failed: usize,
    /// True when another drain was already running and this trigger was
    /// dropped without touching the outbox.
    pub skipped: bool,
}

impl SyncReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Drains the outbox to the remote system.
///
/// The drain guard makes the synchronizer's two states explicit: idle, or
/// one drain in flight. A trigger arriving mid-drain is skipped rather than
/// starting a concurrent drain over the same records.
pub struct Synchronizer {
    outbox: Arc<dyn CommandOutbox>,
    client: Arc<dyn SyncClient>,
    drain_guard: Mutex<()>,
}

impl Synchronizer {
    pub fn new(outbox: Arc<dyn CommandOutbox>, client: Arc<dyn SyncClient>) -> Self {
        Self {
            outbox,
            client,
            drain_guard: Mutex::new(()),
        }
    }

    /// Attempt to deliver every pending record, oldest first.
    ///
    /// Push failures are logged and the record stays queued; they are never
    /// surfaced to the caller that originally issued the command. Outbox
    /// storage errors do propagate - without the outbox there is nothing
    /// sensible to drain.
    pub async fn sync(&self) -> CourierResult<SyncReport> {
        let Ok(_guard) = self.drain_guard.try_lock() else {
            tracing::debug!("sync already in progress, skipping trigger");
            return Ok(SyncReport::skipped());
        };

        let pending = self.outbox.list_all().await?;
        let mut report = SyncReport {
            attempted: pending.len(),
            ..SyncReport::default()
        };

        for record in pending {
            match self.client.push(&record).await {
                Ok(()) => {
                    self.outbox.remove(record.id).await?;
                    report.accepted += 1;
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        command_type = %record.command_type,
                        error = %err,
                        "push failed, record stays queued"
                    );
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_core::{PendingCommand, SyncError};
    use courier_storage::{MemoryStore, StoreOutbox};
    use serde_json::json;
    use tokio::sync::Notify;

    enum Mode {
        AcceptAll,
        RejectAll,
        TransportFailure,
        RejectType(&'static str),
    }

    struct ScriptedClient {
        mode: Mode,
    }

    #[async_trait]
    impl SyncClient for ScriptedClient {
        async fn push(&self, record: &PendingCommand) -> CourierResult<()> {
            match self.mode {
                Mode::AcceptAll => Ok(()),
                Mode::RejectAll => Err(SyncError::Rejected { status: 422 }.into()),
                Mode::TransportFailure => Err(SyncError::Transport {
                    reason: "connection refused".to_string(),
                }
                .into()),
                Mode::RejectType(name) => {
                    if record.command_type == name {
                        Err(SyncError::Rejected { status: 422 }.into())
                    } else {
                        Ok(())
                    }
                }
            }
        }
    }

    async fn outbox_with(records: usize) -> Arc<StoreOutbox> {
        let outbox = Arc::new(StoreOutbox::new(Arc::new(MemoryStore::new())));
        for index in 0..records {
            outbox
                .enqueue(PendingCommand::new("Sample", json!({ "index": index })))
                .await
                .unwrap();
        }
        outbox
    }

    #[tokio::test]
    async fn acceptance_empties_the_outbox() {
        let outbox = outbox_with(3).await;
        let sync = Synchronizer::new(outbox.clone(), Arc::new(ScriptedClient {
            mode: Mode::AcceptAll,
        }));

        let report = sync.sync().await.unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.failed, 0);
        assert!(outbox.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejection_leaves_every_record() {
        let outbox = outbox_with(3).await;
        let sync = Synchronizer::new(outbox.clone(), Arc::new(ScriptedClient {
            mode: Mode::RejectAll,
        }));

        let report = sync.sync().await.unwrap();
        assert_eq!(report.failed, 3);
        assert_eq!(outbox.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn transport_failure_leaves_every_record() {
        let outbox = outbox_with(2).await;
        let sync = Synchronizer::new(outbox.clone(), Arc::new(ScriptedClient {
            mode: Mode::TransportFailure,
        }));

        sync.sync().await.unwrap();
        assert_eq!(outbox.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mixed_outcomes_remove_only_accepted_records() {
        let outbox = Arc::new(StoreOutbox::new(Arc::new(MemoryStore::new())));
        outbox
            .enqueue(PendingCommand::new("Keep", json!({})))
            .await
            .unwrap();
        outbox
            .enqueue(PendingCommand::new("Drop", json!({})))
            .await
            .unwrap();

        let sync = Synchronizer::new(outbox.clone(), Arc::new(ScriptedClient {
            mode: Mode::RejectType("Keep"),
        }));
        let report = sync.sync().await.unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.failed, 1);

        let remaining = outbox.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].command_type, "Keep");
    }

    /// Client that parks in `push` until released, so a drain can be held
    /// open while a second trigger arrives.
    struct ParkedClient {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl SyncClient for ParkedClient {
        async fn push(&self, _record: &PendingCommand) -> CourierResult<()> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_trigger_during_a_drain_is_skipped() {
        let outbox = outbox_with(1).await;
        let client = Arc::new(ParkedClient {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let sync = Arc::new(Synchronizer::new(outbox.clone(), client.clone()));

        let first = tokio::spawn({
            let sync = sync.clone();
            async move { sync.sync().await }
        });
        client.entered.notified().await;

        let second = sync.sync().await.unwrap();
        assert!(second.skipped);
        assert_eq!(second.accepted, 0);

        client.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.accepted, 1);
        assert!(outbox.list_all().await.unwrap().is_empty());
    }
}
