//! Chat-completion processor adapter
//!
//! Forwards a conversation payload to an OpenAI-compatible endpoint and
//! relays the result through the host's output sink, either as one
//! batch write or as a write per streamed partial result. Client
//! failures propagate to the host; only configuration and input
//! problems are surfaced before any I/O.

use crate::conversion::request_builder::{
    InvalidFunctionParameters, build_function_descriptors, build_messages,
};
use crate::core::client::{ClientError, CompletionsClient};
use crate::core::constants::env_key;
use crate::core::env::HostEnv;
use crate::core::plugin::{AdapterKind, Plugin};
use crate::core::sink::{OutputSink, SinkError};
use crate::models::chat::{ChatCompletionInput, ChatCompletionsConfiguration, ChatCompletionsOutput};
use crate::models::wire::{CompletionsCall, CompletionsOptions};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Error types for the chat-completion adapter
#[derive(Debug, Error)]
pub enum ProcessError {
    /// No endpoint configured and none supplied by the environment.
    #[error("base URL is not set")]
    MissingBaseUrl,

    #[error(transparent)]
    InvalidFunctionParameters(#[from] InvalidFunctionParameters),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Processor that relays chat completions from an OpenAI-compatible
/// endpoint
///
/// State is host-validated before construction; `process` never
/// re-validates bounds.
pub struct ChatCompletionsAdapter {
    input: ChatCompletionInput,
    config: ChatCompletionsConfiguration,
    env: HostEnv,
    client: Arc<dyn CompletionsClient>,
}

impl ChatCompletionsAdapter {
    pub fn new(
        input: ChatCompletionInput,
        config: ChatCompletionsConfiguration,
        env: HostEnv,
        client: Arc<dyn CompletionsClient>,
    ) -> Self {
        Self {
            input,
            config,
            env,
            client,
        }
    }

    /// Run the completion and relay output through the sink
    ///
    /// Batch mode writes once; streaming mode writes each partial result
    /// in arrival order, each write awaited before the next partial is
    /// requested. The finalized sink output is returned to the host.
    pub async fn process(
        &self,
        output_stream: &mut dyn OutputSink,
    ) -> Result<ChatCompletionsOutput, ProcessError> {
        let base_url = self
            .config
            .base_url
            .clone()
            .or_else(|| self.env.get(env_key::BASE_URL).map(str::to_string))
            .ok_or(ProcessError::MissingBaseUrl)?;
        let api_key = self.env.get(env_key::API_KEY).map(str::to_string);

        let messages = build_messages(&self.input);
        let functions = match &self.input.functions {
            Some(functions) => Some(build_function_descriptors(functions)?),
            None => None,
        };

        let options = CompletionsOptions {
            base_url,
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: self.config.stream,
            function_call: self.config.function_call.clone(),
        };
        let call = CompletionsCall {
            api_key,
            // Sent empty by contract; messages already carry the history.
            chat_history: Vec::new(),
            messages,
            functions,
        };

        debug!(
            model = %options.model,
            stream = options.stream,
            messages = call.messages.len(),
            "dispatching chat completion"
        );

        if self.config.stream {
            let mut partials = self.client.complete_stream(&options, &call).await?;
            while let Some(partial) = partials.next().await {
                let partial = partial?;
                output_stream
                    .write(ChatCompletionsOutput::new(partial.choices))
                    .await?;
            }
        } else {
            let result = self.client.complete(&options, &call).await?;
            output_stream
                .write(ChatCompletionsOutput::with_raw(result.choices, result.raw))
                .await?;
        }

        Ok(output_stream.finalize())
    }
}

impl Plugin for ChatCompletionsAdapter {
    fn name(&self) -> &'static str {
        AdapterKind::ChatCompletions.descriptor().name
    }

    fn slug(&self) -> &'static str {
        AdapterKind::ChatCompletions.descriptor().slug
    }

    fn provider_slug(&self) -> &'static str {
        AdapterKind::ChatCompletions.descriptor().provider_slug
    }

    fn description(&self) -> &'static str {
        AdapterKind::ChatCompletions.descriptor().description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::CompletionsStream;
    use crate::core::sink::BufferedSink;
    use crate::models::chat::{ChatMessage, Role};
    use crate::models::wire::CompletionsResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Client that records calls and replays canned results.
    #[derive(Default)]
    struct ScriptedClient {
        batch_result: Mutex<Option<CompletionsResult>>,
        stream_fragments: Vec<&'static str>,
        calls: AtomicUsize,
        seen_messages: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl CompletionsClient for ScriptedClient {
        async fn complete(
            &self,
            _options: &CompletionsOptions,
            call: &CompletionsCall,
        ) -> Result<CompletionsResult, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_messages.lock().unwrap() = call.messages.clone();
            Ok(self.batch_result.lock().unwrap().take().unwrap_or_default())
        }

        async fn complete_stream(
            &self,
            _options: &CompletionsOptions,
            call: &CompletionsCall,
        ) -> Result<CompletionsStream, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_messages.lock().unwrap() = call.messages.clone();
            let partials: Vec<Result<CompletionsResult, ClientError>> = self
                .stream_fragments
                .iter()
                .map(|fragment| {
                    Ok(CompletionsResult::new(vec![ChatMessage {
                        role: Role::Assistant,
                        content: Some(fragment.to_string()),
                        name: None,
                        function_call: None,
                    }]))
                })
                .collect();
            Ok(Box::pin(futures::stream::iter(partials)))
        }
    }

    fn adapter_with(
        client: Arc<ScriptedClient>,
        config: ChatCompletionsConfiguration,
        input: ChatCompletionInput,
    ) -> ChatCompletionsAdapter {
        let env = HostEnv::new()
            .with(env_key::BASE_URL, "http://localhost:8080/v1")
            .with(env_key::API_KEY, "sk-local");
        ChatCompletionsAdapter::new(input, config, env, client)
    }

    #[tokio::test]
    async fn test_batch_mode_writes_exactly_once() {
        let client = Arc::new(ScriptedClient {
            batch_result: Mutex::new(Some(CompletionsResult::new(vec![ChatMessage::new(
                Role::Assistant,
                "hello",
            )]))),
            ..Default::default()
        });
        let adapter = adapter_with(
            client.clone(),
            ChatCompletionsConfiguration::default(),
            ChatCompletionInput::default(),
        );

        let mut sink = BufferedSink::new();
        let output = adapter.process(&mut sink).await.unwrap();

        assert_eq!(sink.writes(), 1);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(output.choices[0].content.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_streaming_mode_writes_each_partial_in_order() {
        let client = Arc::new(ScriptedClient {
            stream_fragments: vec!["a", "b", "c"],
            ..Default::default()
        });
        let config = ChatCompletionsConfiguration {
            stream: true,
            ..Default::default()
        };
        let adapter = adapter_with(client.clone(), config, ChatCompletionInput::default());

        let mut sink = BufferedSink::new();
        let output = adapter.process(&mut sink).await.unwrap();

        assert_eq!(sink.writes(), 3);
        // Arrival order is preserved by the merged output.
        assert_eq!(output.choices[0].content.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_system_message_reaches_the_client_first() {
        let client = Arc::new(ScriptedClient::default());
        let input = ChatCompletionInput {
            system_message: Some("You are helpful".to_string()),
            messages: vec![ChatMessage::new(Role::User, "hi")],
            functions: None,
        };
        let adapter = adapter_with(
            client.clone(),
            ChatCompletionsConfiguration::default(),
            input,
        );

        let mut sink = BufferedSink::new();
        adapter.process(&mut sink).await.unwrap();

        let seen = client.seen_messages.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ChatMessage::new(Role::System, "You are helpful"),
                ChatMessage::new(Role::User, "hi"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_base_url_fails_before_any_call() {
        let client = Arc::new(ScriptedClient::default());
        let adapter = ChatCompletionsAdapter::new(
            ChatCompletionInput::default(),
            ChatCompletionsConfiguration::default(),
            HostEnv::new(),
            client.clone(),
        );

        let mut sink = BufferedSink::new();
        let result = adapter.process(&mut sink).await;

        assert!(matches!(result, Err(ProcessError::MissingBaseUrl)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.writes(), 0);
    }

    #[tokio::test]
    async fn test_invalid_function_parameters_fail_before_any_call() {
        let client = Arc::new(ScriptedClient::default());
        let input = ChatCompletionInput {
            system_message: None,
            messages: vec![ChatMessage::new(Role::User, "hi")],
            functions: Some(vec![crate::models::chat::FunctionDef {
                name: "broken".to_string(),
                description: None,
                parameters: Some("{not json".to_string()),
            }]),
        };
        let adapter = adapter_with(
            client.clone(),
            ChatCompletionsConfiguration::default(),
            input,
        );

        let mut sink = BufferedSink::new();
        let result = adapter.process(&mut sink).await;

        assert!(matches!(
            result,
            Err(ProcessError::InvalidFunctionParameters(_))
        ));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_plugin_metadata() {
        let adapter = ChatCompletionsAdapter::new(
            ChatCompletionInput::default(),
            ChatCompletionsConfiguration::default(),
            HostEnv::new(),
            Arc::new(ScriptedClient::default()),
        );
        assert_eq!(adapter.slug(), "chat_completions");
        assert_eq!(adapter.provider_slug(), "localai");
    }
}
