//! Network device session boundary
//!
//! The device-login adapter only needs to open a session and close it
//! again; everything protocol-level is delegated to the session client
//! behind these traits. The production implementation speaks SSH with
//! password authentication.

use async_trait::async_trait;
use std::net::TcpStream;
use thiserror::Error;

/// Error types for device session operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to reach {address}: {message}")]
    Connect { address: String, message: String },

    #[error("handshake with {address} failed: {message}")]
    Handshake { address: String, message: String },

    #[error("authentication rejected for {username}@{address}: {message}")]
    Authentication {
        address: String,
        username: String,
        message: String,
    },

    #[error("session error: {0}")]
    Session(String),
}

/// An open session that only exists to be closed again
#[async_trait]
pub trait DeviceSession: Send {
    async fn close(self: Box<Self>) -> Result<(), DeviceError>;
}

/// External device client boundary
///
/// A non-error return from `open` means the credentials are good.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    async fn open(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn DeviceSession>, DeviceError>;
}

/// SSH-backed device client
///
/// The underlying library is blocking, so session setup and teardown run
/// on the blocking thread pool.
#[derive(Debug, Default)]
pub struct SshDeviceClient;

impl SshDeviceClient {
    pub fn new() -> Self {
        Self
    }
}

struct SshSession {
    session: ssh2::Session,
}

#[async_trait]
impl DeviceClient for SshDeviceClient {
    async fn open(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn DeviceSession>, DeviceError> {
        let address = if address.contains(':') {
            address.to_string()
        } else {
            format!("{address}:22")
        };
        let username = username.to_string();
        let password = password.to_string();

        let session = tokio::task::spawn_blocking(move || {
            let tcp = TcpStream::connect(&address).map_err(|e| DeviceError::Connect {
                address: address.clone(),
                message: e.to_string(),
            })?;

            let mut session =
                ssh2::Session::new().map_err(|e| DeviceError::Session(e.to_string()))?;
            session.set_tcp_stream(tcp);
            session.handshake().map_err(|e| DeviceError::Handshake {
                address: address.clone(),
                message: e.to_string(),
            })?;

            session
                .userauth_password(&username, &password)
                .map_err(|e| DeviceError::Authentication {
                    address: address.clone(),
                    username: username.clone(),
                    message: e.to_string(),
                })?;
            if !session.authenticated() {
                return Err(DeviceError::Authentication {
                    address,
                    username,
                    message: "server rejected the credentials".to_string(),
                });
            }

            Ok(session)
        })
        .await
        .map_err(|e| DeviceError::Session(e.to_string()))??;

        Ok(Box::new(SshSession { session }))
    }
}

#[async_trait]
impl DeviceSession for SshSession {
    async fn close(self: Box<Self>) -> Result<(), DeviceError> {
        tokio::task::spawn_blocking(move || {
            self.session
                .disconnect(None, "credential probe complete", None)
                .map_err(|e| DeviceError::Session(e.to_string()))
        })
        .await
        .map_err(|e| DeviceError::Session(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_against_closed_port_fails_with_connect() {
        let client = SshDeviceClient::new();
        // Nothing listens on port 1 locally; connect is refused outright.
        let result = client.open("127.0.0.1:1", "admin", "secret").await;
        assert!(matches!(result, Err(DeviceError::Connect { .. })));
    }
}
