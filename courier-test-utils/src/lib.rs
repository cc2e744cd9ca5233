//! COURIER Test Utilities
//!
//! Centralized test infrastructure for the COURIER workspace:
//! - Fixtures for building todos in known states
//! - A programmable mock sync client
//! - A counting store decorator for read-count assertions
//! - Proptest generators for the core types

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use courier_core::{CourierResult, PendingCommand, Priority, SyncError, Todo};
use courier_storage::LocalStore;
use courier_sync::SyncClient;
use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

/// A pending todo with the given title and medium priority.
pub fn make_todo(title: &str) -> Todo {
    Todo::new(title, "", Priority::Medium)
}

/// A todo in an arbitrary known state.
pub fn make_todo_with(title: &str, priority: Priority, is_completed: bool) -> Todo {
    let mut todo = Todo::new(title, "", priority);
    todo.is_completed = is_completed;
    if is_completed {
        todo.completed_at = Some(chrono_now());
    }
    todo
}

fn chrono_now() -> courier_core::Timestamp {
    chrono::Utc::now()
}

// ============================================================================
// MOCK SYNC CLIENT
// ============================================================================

/// How the mock answers each push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    AcceptAll,
    RejectAll { status: u16 },
    TransportFailure,
}

/// Sync client that records every push and answers per its current mode.
pub struct MockSyncClient {
    mode: Mutex<SyncMode>,
    pushed: Mutex<Vec<PendingCommand>>,
}

impl MockSyncClient {
    /// Client that accepts everything.
    pub fn accepting() -> Self {
        Self::with_mode(SyncMode::AcceptAll)
    }

    /// Client that rejects everything with the given status.
    pub fn rejecting(status: u16) -> Self {
        Self::with_mode(SyncMode::RejectAll { status })
    }

    /// Client whose transport always fails.
    pub fn failing() -> Self {
        Self::with_mode(SyncMode::TransportFailure)
    }

    pub fn with_mode(mode: SyncMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Change the answer for subsequent pushes.
    pub fn set_mode(&self, mode: SyncMode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Every record pushed so far, accepted or not.
    pub fn pushed(&self) -> Vec<PendingCommand> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncClient for MockSyncClient {
    async fn push(&self, record: &PendingCommand) -> CourierResult<()> {
        self.pushed.lock().unwrap().push(record.clone());
        match *self.mode.lock().unwrap() {
            SyncMode::AcceptAll => Ok(()),
            SyncMode::RejectAll { status } => Err(SyncError::Rejected { status }.into()),
            SyncMode::TransportFailure => Err(SyncError::Transport {
                reason: "simulated transport failure".to_string(),
            }
            .into()),
        }
    }
}

// ============================================================================
// COUNTING STORE
// ============================================================================

/// Store decorator counting loads per key, for "served from cache, not from
/// storage" assertions.
pub struct CountingStore<S> {
    inner: S,
    loads: Mutex<HashMap<String, usize>>,
}

impl<S: LocalStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `key` has been loaded.
    pub fn loads_for(&self, key: &str) -> usize {
        self.loads.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl<S: LocalStore> LocalStore for CountingStore<S> {
    async fn save(&self, key: &str, value: serde_json::Value) -> CourierResult<()> {
        self.inner.save(key, value).await
    }

    async fn load(&self, key: &str) -> CourierResult<Option<serde_json::Value>> {
        *self.loads.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
        self.inner.load(key).await
    }

    async fn remove(&self, key: &str) -> CourierResult<()> {
        self.inner.remove(key).await
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Any priority.
pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// A todo with arbitrary title, priority, and completion state.
pub fn todo_strategy() -> impl Strategy<Value = Todo> {
    ("[a-zA-Z0-9 ]{1,40}", priority_strategy(), any::<bool>())
        .prop_map(|(title, priority, is_completed)| make_todo_with(&title, priority, is_completed))
}
