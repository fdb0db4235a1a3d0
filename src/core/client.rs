//! OpenAI-compatible completions client
//!
//! This module defines the external client boundary the chat-completion
//! adapter calls through, plus the production HTTP implementation. The
//! protocol specifics (request body, SSE framing) live entirely here;
//! adapters only see ChatMessage-shaped choices.

use crate::core::constants::endpoint;
use crate::models::chat::ChatMessage;
use crate::models::wire::{
    CompletionsCall, CompletionsOptions, CompletionsResult, WireChunk, WireRequest, WireResponse,
};
use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Error types for completions-client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response payload: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Stream of partial results from a streaming completions call
pub type CompletionsStream =
    Pin<Box<dyn Stream<Item = Result<CompletionsResult, ClientError>> + Send>>;

/// External completions client boundary
#[async_trait]
pub trait CompletionsClient: Send + Sync {
    /// Single blocking call returning one complete result.
    async fn complete(
        &self,
        options: &CompletionsOptions,
        call: &CompletionsCall,
    ) -> Result<CompletionsResult, ClientError>;

    /// One call returning a finite sequence of partial results.
    async fn complete_stream(
        &self,
        options: &CompletionsOptions,
        call: &CompletionsCall,
    ) -> Result<CompletionsStream, ClientError>;
}

/// Production client speaking the OpenAI-compatible HTTP protocol
pub struct HttpCompletionsClient {
    client: Client,
}

impl HttpCompletionsClient {
    /// Create a client with the given request timeout in seconds
    pub fn new(timeout: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    fn completions_url(options: &CompletionsOptions) -> String {
        format!(
            "{}{}",
            options.base_url.trim_end_matches('/'),
            endpoint::CHAT_COMPLETIONS
        )
    }

    async fn post(
        &self,
        options: &CompletionsOptions,
        call: &CompletionsCall,
        stream: bool,
    ) -> Result<reqwest::Response, ClientError> {
        let url = Self::completions_url(options);
        let body = wire_request(options, call, stream);

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &call.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status.as_u16() {
                401 => ClientError::Authentication(message),
                429 => ClientError::RateLimit(message),
                400 => ClientError::BadRequest(message),
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionsClient for HttpCompletionsClient {
    async fn complete(
        &self,
        options: &CompletionsOptions,
        call: &CompletionsCall,
    ) -> Result<CompletionsResult, ClientError> {
        let response = self.post(options, call, false).await?;

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let wire: WireResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let mut choices: Vec<ChatMessage> = Vec::new();
        for choice in wire.choices {
            place_choice(&mut choices, choice.index as usize, choice.message);
        }

        Ok(CompletionsResult::with_raw(choices, Some(raw)))
    }

    async fn complete_stream(
        &self,
        options: &CompletionsOptions,
        call: &CompletionsCall,
    ) -> Result<CompletionsStream, ClientError> {
        let response = self.post(options, call, true).await?;

        use futures::TryStreamExt;
        use tokio::io::AsyncBufReadExt;
        use tokio_stream::wrappers::LinesStream;

        let byte_stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let reader = tokio_util::io::StreamReader::new(byte_stream);
        let lines = tokio::io::BufReader::new(reader).lines();
        let mut line_stream = LinesStream::new(lines);

        let stream = async_stream::stream! {
            while let Some(line) = line_stream.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(ClientError::Transport(e.to_string()));
                        break;
                    }
                };

                match parse_sse_line(&line) {
                    Ok(SseLine::Skip) => continue,
                    Ok(SseLine::Done) => break,
                    Ok(SseLine::Chunk(chunk)) => yield Ok(chunk_to_result(chunk)),
                    Err(e) => warn!("Skipping malformed stream chunk: {}", e),
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Compose the wire request body. History goes ahead of the current
/// messages; this slice always sends it empty.
fn wire_request(options: &CompletionsOptions, call: &CompletionsCall, stream: bool) -> WireRequest {
    let mut messages = Vec::with_capacity(call.chat_history.len() + call.messages.len());
    messages.extend(call.chat_history.iter().cloned());
    messages.extend(call.messages.iter().cloned());

    WireRequest {
        model: options.model.clone(),
        messages,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        stream,
        functions: call.functions.clone(),
        function_call: options.function_call.clone(),
    }
}

enum SseLine {
    Chunk(WireChunk),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> Result<SseLine, serde_json::Error> {
    let Some(payload) = line.trim().strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(SseLine::Skip);
    }
    if payload == "[DONE]" {
        return Ok(SseLine::Done);
    }
    Ok(SseLine::Chunk(serde_json::from_str(payload)?))
}

/// Map one streamed chunk onto ChatMessage-shaped partial choices.
fn chunk_to_result(chunk: WireChunk) -> CompletionsResult {
    let mut choices: Vec<ChatMessage> = Vec::new();
    for choice in chunk.choices {
        place_choice(&mut choices, choice.index as usize, choice.delta.into_message());
    }
    CompletionsResult::new(choices)
}

// Choice position must equal the choice index so downstream merging
// lines up; gaps are padded with empty placeholders.
fn place_choice(choices: &mut Vec<ChatMessage>, index: usize, message: ChatMessage) {
    while choices.len() <= index {
        choices.push(ChatMessage {
            role: Default::default(),
            content: None,
            name: None,
            function_call: None,
        });
    }
    choices[index] = message;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[test]
    fn test_parse_sse_line_maps_delta_onto_choices() {
        let line = r#"data: {"choices": [{"index": 0, "delta": {"role": "assistant", "content": "Hi"}}]}"#;
        let SseLine::Chunk(chunk) = parse_sse_line(line).unwrap() else {
            panic!("expected a chunk");
        };
        let result = chunk_to_result(chunk);
        assert_eq!(result.choices.len(), 1);
        assert_eq!(result.choices[0].role, Role::Assistant);
        assert_eq!(result.choices[0].content.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_parse_sse_line_recognizes_done_and_noise() {
        assert!(matches!(parse_sse_line("data: [DONE]"), Ok(SseLine::Done)));
        assert!(matches!(parse_sse_line(""), Ok(SseLine::Skip)));
        assert!(matches!(
            parse_sse_line(": keep-alive"),
            Ok(SseLine::Skip)
        ));
        assert!(parse_sse_line("data: {not json").is_err());
    }

    #[test]
    fn test_chunk_choices_are_padded_to_their_index() {
        let line = r#"data: {"choices": [{"index": 1, "delta": {"content": "second"}}]}"#;
        let SseLine::Chunk(chunk) = parse_sse_line(line).unwrap() else {
            panic!("expected a chunk");
        };
        let result = chunk_to_result(chunk);
        assert_eq!(result.choices.len(), 2);
        assert_eq!(result.choices[0].content, None);
        assert_eq!(result.choices[1].content.as_deref(), Some("second"));
    }

    #[test]
    fn test_completions_url_normalizes_trailing_slash() {
        let options = CompletionsOptions {
            base_url: "http://localhost:8080/v1/".to_string(),
            model: "ggml-gpt4all-j".to_string(),
            max_tokens: 16,
            temperature: 0.7,
            stream: false,
            function_call: None,
        };
        assert_eq!(
            HttpCompletionsClient::completions_url(&options),
            "http://localhost:8080/v1/chat/completions"
        );
    }
}
