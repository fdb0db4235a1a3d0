//! Plugin adapters bridging an orchestration host to external systems
//!
//! This crate provides two adapters for a larger orchestration platform:
//! a device-login connection handler that verifies credentials with a
//! single open-and-close session probe, and a chat-completion processor
//! that forwards conversation payloads to an OpenAI-compatible endpoint
//! and relays results, batch or streamed, through a host-owned output
//! sink. The host supplies configuration, environment secrets, and the
//! sink; the external protocols live behind the `core` client
//! boundaries.

pub mod adapters;
pub mod conversion;
pub mod core;
pub mod models;

pub use crate::adapters::chat_completions::{ChatCompletionsAdapter, ProcessError};
pub use crate::adapters::device_login::{ActivationEvent, ActivationFailure, DeviceLoginAdapter};
pub use crate::core::client::{
    ClientError, CompletionsClient, CompletionsStream, HttpCompletionsClient,
};
pub use crate::core::config::HostConfig;
pub use crate::core::device::{DeviceClient, DeviceError, DeviceSession, SshDeviceClient};
pub use crate::core::env::HostEnv;
pub use crate::core::logging::init_logging;
pub use crate::core::plugin::{AdapterKind, Plugin, PluginDescriptor};
pub use crate::core::sink::{BufferedSink, OutputSink, SinkError};
pub use crate::models::chat::{
    ChatCompletionInput, ChatCompletionsConfiguration, ChatCompletionsOutput, ChatMessage,
    FunctionCallResponse, FunctionDef, InvalidConfiguration, Role,
};
pub use crate::models::connection::{Connection, ConnectionConfiguration, ConnectionStatus};
pub use crate::models::wire::{
    CompletionsCall, CompletionsOptions, CompletionsResult, FunctionDescriptor,
};
