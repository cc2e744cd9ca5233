//! The pending-command record held in the outbox until the remote system
//! confirms acceptance.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A command that executed locally but has not yet been accepted remotely.
///
/// Records survive process restarts; they are removed only once the
/// synchronizer confirms remote acceptance. Logically identical commands
/// produce distinct records - the outbox never deduplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCommand {
    pub id: Uuid,
    pub command_type: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PendingCommand {
    /// Build a record for a freshly executed command.
    pub fn new(command_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            command_type: command_type.into(),
            payload,
            created_at: Utc::now(),
        }
    }

    /// Decode the payload back into the command it was serialized from.
    pub fn decode_payload<C: DeserializeOwned>(&self) -> Result<C, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
