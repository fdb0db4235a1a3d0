//! Client-boundary request and response shapes
//!
//! This module defines the structures exchanged with the completions
//! client: the caller-facing options/call pair and the JSON structures
//! that actually cross the wire.

use crate::models::chat::{ChatMessage, FunctionCallResponse, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Endpoint and sampling options for one completions call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionsOptions {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
    /// Controls how the model responds to function calls.
    pub function_call: Option<String>,
}

/// Payload for one completions call
///
/// `chat_history` is sent ahead of `messages` when non-empty; this slice
/// always sends it empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionsCall {
    pub api_key: Option<String>,
    pub chat_history: Vec<ChatMessage>,
    pub messages: Vec<ChatMessage>,
    pub functions: Option<Vec<FunctionDescriptor>>,
}

/// Function definition in the shape the endpoint expects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: HashMap<String, Value>,
}

/// One complete or partial result from the completions client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionsResult {
    /// Ordered message choices; position is the choice index.
    pub choices: Vec<ChatMessage>,
    pub(crate) raw: Option<Value>,
}

impl CompletionsResult {
    pub fn new(choices: Vec<ChatMessage>) -> Self {
        Self { choices, raw: None }
    }

    pub(crate) fn with_raw(choices: Vec<ChatMessage>, raw: Option<Value>) -> Self {
        Self { choices, raw }
    }
}

/// Request body for `POST {base_url}/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
}

/// Batch response body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireResponse {
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

/// One server-sent chunk of a streaming response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireChunk {
    #[serde(default)]
    pub choices: Vec<WireStreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireStreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: WireDelta,
    #[serde(default)]
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WireDelta {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCallResponse>,
}

impl WireDelta {
    /// Lift a delta into a ChatMessage-shaped partial choice.
    pub(crate) fn into_message(self) -> ChatMessage {
        ChatMessage {
            role: self.role.unwrap_or_default(),
            content: self.content,
            name: None,
            function_call: self.function_call,
        }
    }
}
