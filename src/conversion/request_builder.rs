//! Chat request shaping
//!
//! This module translates the host-validated chat input into the message
//! list and function descriptors the completions client expects.

use crate::models::chat::{ChatCompletionInput, ChatMessage, FunctionDef, Role};
use crate::models::wire::FunctionDescriptor;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// A function definition whose `parameters` string is not valid JSON
#[derive(Debug, Error)]
#[error("function \"{function}\" has parameters that are not valid JSON: {source}")]
pub struct InvalidFunctionParameters {
    pub function: String,
    #[source]
    pub source: serde_json::Error,
}

/// Build the outgoing message list
///
/// A non-empty system message is prepended as a system-role entry; the
/// input messages follow in conversation order, carried through
/// verbatim.
pub fn build_messages(input: &ChatCompletionInput) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(input.messages.len() + 1);

    if let Some(system_message) = input.system_message.as_deref() {
        if !system_message.is_empty() {
            messages.push(ChatMessage::new(Role::System, system_message));
        }
    }

    messages.extend(input.messages.iter().cloned());
    messages
}

/// Translate function definitions into the endpoint's descriptor shape
///
/// `parameters` is parsed from its JSON-string form into a structured
/// object; a definition without parameters gets an empty object.
/// Definitions without a name are dropped. Returns an error before any
/// I/O when a parameters string fails to parse.
pub fn build_function_descriptors(
    functions: &[FunctionDef],
) -> Result<Vec<FunctionDescriptor>, InvalidFunctionParameters> {
    functions
        .iter()
        .filter(|function| !function.name.trim().is_empty())
        .map(|function| {
            let parameters: HashMap<String, Value> = match function.parameters.as_deref() {
                Some(parameters) => serde_json::from_str(parameters).map_err(|source| {
                    InvalidFunctionParameters {
                        function: function.name.clone(),
                        source,
                    }
                })?,
                None => HashMap::new(),
            };

            Ok(FunctionDescriptor {
                name: function.name.clone(),
                description: function.description.clone(),
                parameters,
            })
        })
        .collect()
}
