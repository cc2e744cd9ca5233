//! Remote sync endpoint client.

use async_trait::async_trait;
use courier_core::{CourierResult, PendingCommand, SyncError};

/// Transmits one pending command to the remote system.
///
/// `Ok(())` means confirmed acceptance; any error means the record must
/// stay in the outbox. The core's contract with the remote side is only
/// "send serialized command, receive success or failure" - no schema is
/// enforced here.
#[async_trait]
pub trait SyncClient: Send + Sync {
    async fn push(&self, record: &PendingCommand) -> CourierResult<()>;
}

/// HTTP implementation posting records as JSON.
pub struct HttpSyncClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpSyncClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Use a preconfigured client (timeouts, proxies, test servers).
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SyncClient for HttpSyncClient {
    async fn push(&self, record: &PendingCommand) -> CourierResult<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|err| SyncError::Transport {
                reason: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Rejected {
                status: status.as_u16(),
            }
            .into())
        }
    }
}
