//! Output sink boundary
//!
//! Adapters hand every result to a host-owned sink: zero or more
//! `write` calls followed by one `finalize`. The sink is the only
//! channel back to the caller.

use crate::models::chat::ChatCompletionsOutput;
use async_trait::async_trait;
use thiserror::Error;

/// Failure writing to the host's output channel
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output sink is closed")]
    Closed,
}

/// Host-owned channel for adapter output
///
/// Each awaited `write` completes before the adapter requests the next
/// partial result, which keeps delivery strictly in arrival order and
/// lets the sink provide natural backpressure.
#[async_trait]
pub trait OutputSink: Send {
    /// Deliver one complete or partial output.
    async fn write(&mut self, output: ChatCompletionsOutput) -> Result<(), SinkError>;

    /// Close the sink and return the finished output representation.
    fn finalize(&mut self) -> ChatCompletionsOutput;
}

/// In-memory sink that merges partial writes into one finished output
///
/// Streamed deltas for the same choice index are folded together:
/// content and function-call argument fragments concatenate in arrival
/// order. A single batch write passes through unchanged.
#[derive(Debug, Default)]
pub struct BufferedSink {
    merged: ChatCompletionsOutput,
    writes: usize,
    closed: bool,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes accepted so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait]
impl OutputSink for BufferedSink {
    async fn write(&mut self, output: ChatCompletionsOutput) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.merged.absorb(output);
        self.writes += 1;
        Ok(())
    }

    fn finalize(&mut self) -> ChatCompletionsOutput {
        self.closed = true;
        std::mem::take(&mut self.merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::{ChatMessage, Role};

    fn delta(content: &str) -> ChatCompletionsOutput {
        ChatCompletionsOutput::new(vec![ChatMessage {
            role: Role::Assistant,
            content: Some(content.to_string()),
            name: None,
            function_call: None,
        }])
    }

    #[tokio::test]
    async fn test_finalize_merges_streamed_deltas() {
        let mut sink = BufferedSink::new();
        for fragment in ["The", " quick", " fox"] {
            sink.write(delta(fragment)).await.unwrap();
        }
        assert_eq!(sink.writes(), 3);

        let output = sink.finalize();
        assert_eq!(output.choices.len(), 1);
        assert_eq!(output.choices[0].content.as_deref(), Some("The quick fox"));
        assert_eq!(output.choices[0].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_single_batch_write_passes_through() {
        let mut sink = BufferedSink::new();
        let batch = delta("complete answer");
        sink.write(batch.clone()).await.unwrap();
        assert_eq!(sink.finalize(), batch);
    }

    #[tokio::test]
    async fn test_write_after_finalize_is_rejected() {
        let mut sink = BufferedSink::new();
        sink.finalize();
        assert!(matches!(
            sink.write(delta("late")).await,
            Err(SinkError::Closed)
        ));
    }
}
