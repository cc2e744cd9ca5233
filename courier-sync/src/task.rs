//! Background sync task.
//!
//! Drains the outbox once at startup, then on every external trigger (the
//! host application fires one per navigation-like event), on a periodic
//! interval, and stops on the shutdown signal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::synchronizer::Synchronizer;

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the background sync task.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How often to drain the outbox without an external trigger
    /// (default: 60 seconds).
    pub interval: Duration,

    /// Whether to log cycles that left records queued (default: true).
    pub log_failures: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            log_failures: true,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the periodic drain interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Create SyncConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `COURIER_SYNC_INTERVAL_SECS`: periodic drain interval (default: 60)
    /// - `COURIER_SYNC_LOG_FAILURES`: whether to log failed cycles
    ///   (default: true)
    pub fn from_env() -> Self {
        let interval = Duration::from_secs(
            std::env::var("COURIER_SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS),
        );

        let log_failures = std::env::var("COURIER_SYNC_LOG_FAILURES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            interval,
            log_failures,
        }
    }

    /// Configuration for development/testing with a short interval.
    pub fn development() -> Self {
        Self {
            interval: Duration::from_secs(5),
            log_failures: true,
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters tracking sync activity since startup.
#[derive(Debug, Default)]
pub struct SyncMetrics {
    /// Drain cycles started (including skipped ones).
    pub sync_cycles: AtomicU64,

    /// Records confirmed by the remote system and removed.
    pub records_accepted: AtomicU64,

    /// Push attempts that left their record queued.
    pub records_failed: AtomicU64,

    /// Cycles that failed outright (outbox storage errors).
    pub sync_errors: AtomicU64,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            sync_cycles: self.sync_cycles.load(Ordering::Relaxed),
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            sync_errors: self.sync_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of sync metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub sync_cycles: u64,
    pub records_accepted: u64,
    pub records_failed: u64,
    pub sync_errors: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// What caused a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The host application navigated (or an equivalent user-visible
    /// transition happened).
    Navigation,
    /// Someone asked for a drain explicitly.
    Manual,
}

/// Run the background sync loop until shutdown.
///
/// Drains once immediately, then reacts to triggers, the periodic tick,
/// and the shutdown watch channel. Closing the trigger channel also shuts
/// the task down. Returns the metrics collected over the task's lifetime.
pub async fn sync_task(
    synchronizer: Arc<Synchronizer>,
    config: SyncConfig,
    mut triggers: mpsc::Receiver<SyncTrigger>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<SyncMetrics> {
    let metrics = Arc::new(SyncMetrics::new());

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        "Sync task started"
    );

    // Startup drain: whatever survived the last process run goes first.
    run_cycle(&synchronizer, &config, &metrics).await;

    let mut tick = interval(config.interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a fresh interval completes immediately; the
    // startup drain already covered it.
    tick.reset();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("Sync task shutting down");
                    break;
                }
            }

            maybe_trigger = triggers.recv() => {
                match maybe_trigger {
                    Some(trigger) => {
                        tracing::debug!(?trigger, "sync trigger received");
                        run_cycle(&synchronizer, &config, &metrics).await;
                    }
                    None => {
                        tracing::info!("Sync trigger channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = tick.tick() => {
                run_cycle(&synchronizer, &config, &metrics).await;
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        cycles = snapshot.sync_cycles,
        accepted = snapshot.records_accepted,
        failed = snapshot.records_failed,
        errors = snapshot.sync_errors,
        "Sync task completed"
    );

    metrics
}

/// Perform one drain cycle and record its outcome.
async fn run_cycle(synchronizer: &Synchronizer, config: &SyncConfig, metrics: &SyncMetrics) {
    metrics.sync_cycles.fetch_add(1, Ordering::Relaxed);

    match synchronizer.sync().await {
        Ok(report) if report.skipped => {}
        Ok(report) => {
            metrics
                .records_accepted
                .fetch_add(report.accepted as u64, Ordering::Relaxed);
            metrics
                .records_failed
                .fetch_add(report.failed as u64, Ordering::Relaxed);

            if report.failed > 0 && config.log_failures {
                tracing::warn!(
                    attempted = report.attempted,
                    accepted = report.accepted,
                    failed = report.failed,
                    "sync cycle left records queued"
                );
            } else if report.attempted > 0 {
                tracing::info!(accepted = report.accepted, "sync cycle completed");
            } else {
                tracing::trace!("sync cycle completed with empty outbox");
            }
        }
        Err(err) => {
            metrics.sync_errors.fetch_add(1, Ordering::Relaxed);
            tracing::error!(error = %err, "sync cycle failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SyncClient;
    use async_trait::async_trait;
    use courier_core::{CourierResult, PendingCommand};
    use courier_storage::{CommandOutbox, MemoryStore, StoreOutbox};
    use serde_json::json;

    #[test]
    fn config_default() {
        let config = SyncConfig::default();
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(config.log_failures);
    }

    #[test]
    fn config_development() {
        let config = SyncConfig::development();
        assert_eq!(config.interval, Duration::from_secs(5));
    }

    #[test]
    fn config_builder() {
        let config = SyncConfig::new().with_interval(Duration::from_secs(10));
        assert_eq!(config.interval, Duration::from_secs(10));
    }

    #[test]
    fn metrics_snapshot() {
        let metrics = SyncMetrics::new();
        metrics.sync_cycles.store(4, Ordering::Relaxed);
        metrics.records_accepted.store(7, Ordering::Relaxed);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sync_cycles, 4);
        assert_eq!(snapshot.records_accepted, 7);
        assert_eq!(snapshot.records_failed, 0);
    }

    struct AcceptAll;

    #[async_trait]
    impl SyncClient for AcceptAll {
        async fn push(&self, _record: &PendingCommand) -> CourierResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn task_drains_on_startup_and_on_trigger() {
        let outbox = Arc::new(StoreOutbox::new(Arc::new(MemoryStore::new())));
        outbox
            .enqueue(PendingCommand::new("Sample", json!({})))
            .await
            .unwrap();
        let synchronizer = Arc::new(Synchronizer::new(outbox.clone(), Arc::new(AcceptAll)));

        let (trigger_tx, trigger_rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sync_task(
            synchronizer,
            SyncConfig::default(),
            trigger_rx,
            shutdown_rx,
        ));

        trigger_tx.send(SyncTrigger::Navigation).await.unwrap();
        trigger_tx.send(SyncTrigger::Manual).await.unwrap();
        shutdown_tx.send(true).unwrap();

        let metrics = handle.await.unwrap();
        let snapshot = metrics.snapshot();
        // Startup drain plus up to two triggered drains, depending on how
        // quickly shutdown is observed.
        assert!(snapshot.sync_cycles >= 1);
        assert_eq!(snapshot.records_accepted, 1);
        assert!(outbox.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn closing_the_trigger_channel_stops_the_task() {
        let outbox = Arc::new(StoreOutbox::new(Arc::new(MemoryStore::new())));
        let synchronizer = Arc::new(Synchronizer::new(outbox, Arc::new(AcceptAll)));

        let (trigger_tx, trigger_rx) = mpsc::channel::<SyncTrigger>(1);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sync_task(
            synchronizer,
            SyncConfig::default(),
            trigger_rx,
            shutdown_rx,
        ));

        drop(trigger_tx);
        let metrics = handle.await.unwrap();
        assert!(metrics.snapshot().sync_cycles >= 1);
    }
}
