//! Device-login connection adapter
//!
//! Activation is a credential probe: open a session with the
//! connection's credentials, close it immediately, and report the
//! outcome. One attempt, no retries, and every session-client failure is
//! converted into a structured failure record instead of propagating.

use crate::core::device::{DeviceClient, DeviceError, SshDeviceClient};
use crate::core::plugin::{AdapterKind, Plugin};
use crate::models::connection::{Connection, ConnectionConfiguration, ConnectionStatus};
use futures::stream::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{info, warn};

/// Failure record yielded when activation does not succeed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationFailure {
    pub error: String,
    pub connection: Connection,
}

/// Outcome of a single activation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActivationEvent {
    Activated(Connection),
    Failed(ActivationFailure),
}

/// Connection handler that verifies device credentials
pub struct DeviceLoginAdapter {
    client: Arc<dyn DeviceClient>,
}

impl DeviceLoginAdapter {
    pub fn new(client: Arc<dyn DeviceClient>) -> Self {
        Self { client }
    }

    /// Production adapter over the SSH session client
    pub fn with_ssh() -> Self {
        Self::new(Arc::new(SshDeviceClient::new()))
    }

    /// Probe the device with the connection's credentials
    ///
    /// Yields a finite, non-restartable sequence of exactly one event.
    /// The connection's status is set in place: `Active` on success,
    /// `Failed` otherwise, in which case the event carries the error
    /// message alongside a snapshot of the connection.
    pub fn activate<'a>(
        &'a self,
        connection: &'a mut Connection,
    ) -> Pin<Box<dyn Stream<Item = ActivationEvent> + Send + 'a>> {
        Box::pin(async_stream::stream! {
            match self.probe(&connection.configuration).await {
                Ok(()) => {
                    connection.status = ConnectionStatus::Active;
                    info!(connection_id = %connection.id, "device login verified");
                    yield ActivationEvent::Activated(connection.clone());
                }
                Err(e) => {
                    connection.status = ConnectionStatus::Failed;
                    warn!(connection_id = %connection.id, error = %e, "device login failed");
                    yield ActivationEvent::Failed(ActivationFailure {
                        error: e.to_string(),
                        connection: connection.clone(),
                    });
                }
            }
        })
    }

    // Open and immediately close: the session only exists to prove the
    // credentials work.
    async fn probe(&self, configuration: &ConnectionConfiguration) -> Result<(), DeviceError> {
        let session = self
            .client
            .open(
                &configuration.device_address,
                &configuration.username,
                &configuration.password,
            )
            .await?;
        session.close().await
    }
}

impl Plugin for DeviceLoginAdapter {
    fn name(&self) -> &'static str {
        AdapterKind::DeviceLogin.descriptor().name
    }

    fn slug(&self) -> &'static str {
        AdapterKind::DeviceLogin.descriptor().slug
    }

    fn provider_slug(&self) -> &'static str {
        AdapterKind::DeviceLogin.descriptor().provider_slug
    }

    fn description(&self) -> &'static str {
        AdapterKind::DeviceLogin.descriptor().description
    }
}
