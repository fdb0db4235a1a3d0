//! Chat completion schema types
//!
//! This module defines the host-facing input, configuration, and output
//! structures for the chat-completion adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Lower bound for `max_tokens`
pub const MIN_MAX_TOKENS: u32 = 1;

/// Upper bound for `max_tokens`
pub const MAX_MAX_TOKENS: u32 = 32_000;

/// Upper bound for `temperature`
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Function,
}

impl Role {
    /// Wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function call echoed back by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// A single conversation message
///
/// Ordering matters: the host supplies messages in conversation order and
/// the adapter carries them through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(default = "ChatMessage::default_content")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallResponse>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
            function_call: None,
        }
    }

    fn default_content() -> Option<String> {
        Some(String::new())
    }

    /// Fold a streamed partial message into this one: content and
    /// function-call argument fragments concatenate, the rest is
    /// last-writer-wins.
    pub(crate) fn absorb(&mut self, partial: ChatMessage) {
        if let Some(fragment) = partial.content {
            match &mut self.content {
                Some(content) => content.push_str(&fragment),
                None => self.content = Some(fragment),
            }
        }
        if partial.name.is_some() {
            self.name = partial.name;
        }
        if let Some(call) = partial.function_call {
            let merged = self.function_call.get_or_insert_with(Default::default);
            if call.name.is_some() {
                merged.name = call.name;
            }
            if let Some(fragment) = call.arguments {
                match &mut merged.arguments {
                    Some(arguments) => arguments.push_str(&fragment),
                    None => merged.arguments = Some(fragment),
                }
            }
        }
    }
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self::new(Role::default(), String::new())
    }
}

/// A callable function offered to the model
///
/// `parameters` holds a JSON Schema document as a raw JSON string; it is
/// parsed into a structured object when the request is shaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

/// Host-validated input to the chat-completion adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    #[serde(default = "ChatCompletionInput::default_messages")]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDef>>,
}

impl ChatCompletionInput {
    // `messages` is never empty; a lone placeholder user message stands in
    // when the host supplies none.
    fn default_messages() -> Vec<ChatMessage> {
        vec![ChatMessage::default()]
    }
}

impl Default for ChatCompletionInput {
    fn default() -> Self {
        Self {
            system_message: None,
            messages: Self::default_messages(),
            functions: None,
        }
    }
}

/// Configuration for the chat-completion adapter
///
/// Bounds are enforced once at the boundary via [`validate`]; the adapter
/// trusts validated values and never recomputes them.
///
/// [`validate`]: ChatCompletionsConfiguration::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
}

fn default_model() -> String {
    "ggml-gpt4all-j".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ChatCompletionsConfiguration {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            stream: false,
            function_call: None,
        }
    }
}

/// Validation failure for [`ChatCompletionsConfiguration`]
#[derive(Debug, Error)]
pub enum InvalidConfiguration {
    #[error("max_tokens must be between {MIN_MAX_TOKENS} and {MAX_MAX_TOKENS}, got {0}")]
    MaxTokensOutOfRange(u32),

    #[error("temperature must be between 0.0 and {MAX_TEMPERATURE}, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("temperature must be a multiple of 0.1, got {0}")]
    TemperatureOffStep(f32),
}

impl ChatCompletionsConfiguration {
    /// Check the declared bounds: `max_tokens` in 1..=32000, `temperature`
    /// in 0.0..=2.0 in steps of 0.1.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&self.max_tokens) {
            return Err(InvalidConfiguration::MaxTokensOutOfRange(self.max_tokens));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(InvalidConfiguration::TemperatureOutOfRange(self.temperature));
        }
        // Step check on tenths; exact float modulo rejects legitimate values.
        let tenths = self.temperature * 10.0;
        if (tenths - tenths.round()).abs() > 1e-6 {
            return Err(InvalidConfiguration::TemperatureOffStep(self.temperature));
        }
        Ok(())
    }
}

/// Output of the chat-completion adapter: ordered message choices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsOutput {
    #[serde(default)]
    pub choices: Vec<ChatMessage>,
    /// Raw upstream response; not part of the public contract.
    #[serde(skip)]
    pub(crate) api_response: Option<Value>,
}

impl ChatCompletionsOutput {
    pub fn new(choices: Vec<ChatMessage>) -> Self {
        Self {
            choices,
            api_response: None,
        }
    }

    pub(crate) fn with_raw(choices: Vec<ChatMessage>, api_response: Option<Value>) -> Self {
        Self {
            choices,
            api_response,
        }
    }

    /// Merge a partial output into this one, choice by choice. Choice
    /// position is the choice index, so streamed deltas line up.
    pub(crate) fn absorb(&mut self, partial: ChatCompletionsOutput) {
        for (index, message) in partial.choices.into_iter().enumerate() {
            match self.choices.get_mut(index) {
                Some(choice) => choice.absorb(message),
                None => self.choices.push(message),
            }
        }
        if partial.api_response.is_some() {
            self.api_response = partial.api_response;
        }
    }
}
