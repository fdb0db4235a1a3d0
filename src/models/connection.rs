//! Connection schema types
//!
//! A `Connection` identifies a configured external endpoint. The host
//! creates it before activation; the device-login adapter sets its status
//! exactly once and never owns it beyond the call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Created,
    Connecting,
    Active,
    Failed,
}

/// Credentials and address for a network device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfiguration {
    /// Address of the device
    #[serde(default = "default_device_address")]
    pub device_address: String,
    /// Username for the device
    pub username: String,
    /// Password for the account
    pub password: String,
}

fn default_device_address() -> String {
    "localhost".to_string()
}

/// A configured external endpoint with a mutable status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default = "new_connection_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub configuration: ConnectionConfiguration,
    #[serde(default)]
    pub status: ConnectionStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_connection_id() -> String {
    Uuid::new_v4().to_string()
}

impl Connection {
    pub fn new(name: impl Into<String>, configuration: ConnectionConfiguration) -> Self {
        Self {
            id: new_connection_id(),
            name: name.into(),
            description: String::new(),
            configuration,
            status: ConnectionStatus::default(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_connection_starts_created() {
        let connection = Connection::new(
            "lab router",
            ConnectionConfiguration {
                device_address: "10.0.0.1".to_string(),
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
        );
        assert_eq!(connection.status, ConnectionStatus::Created);
        assert!(!connection.id.is_empty());
    }

    #[test]
    fn test_configuration_defaults_address_to_localhost() {
        let configuration: ConnectionConfiguration =
            serde_json::from_str(r#"{"username": "admin", "password": "secret"}"#).unwrap();
        assert_eq!(configuration.device_address, "localhost");
    }
}
