//! COURIER Sync - Outbox Synchronizer
//!
//! At-least-once delivery of command side effects to a remote system. The
//! [`Synchronizer`] drains the outbox: every pending record is pushed to
//! the remote endpoint in insertion order; confirmed acceptance removes the
//! record, any failure leaves it queued for a later attempt. No retry
//! count, no backoff, no dead-lettering - a record stays until the remote
//! side takes it.
//!
//! [`sync_task`] runs the drain in the background, driven by external
//! triggers, a periodic interval, and a shutdown watch channel.

mod client;
mod synchronizer;
mod task;

pub use client::{HttpSyncClient, SyncClient};
pub use synchronizer::{SyncReport, Synchronizer};
pub use task::{sync_task, SyncConfig, SyncMetrics, SyncSnapshot, SyncTrigger};
