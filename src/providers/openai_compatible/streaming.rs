//! Chat Completions SSE conversion
//!
//! Shared by OpenAI and Groq. Each data payload is a `chat.completion.chunk`;
//! the text lives at `choices[0].delta.content`. The literal `[DONE]` payload
//! closes the stream.

use eventsource_stream::Event;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LlmError, classify_error_object};
use crate::types::ProviderKind;
use crate::utils::streaming::{SseFragmentConverter, parse_event_data};

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Event converter for chat-completions streams
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletionsEventConverter {
    provider: ProviderKind,
}

impl ChatCompletionsEventConverter {
    pub fn new(provider: ProviderKind) -> Self {
        Self { provider }
    }
}

impl SseFragmentConverter for ChatCompletionsEventConverter {
    fn convert_event(&self, event: &Event) -> Result<Option<String>, LlmError> {
        let raw: Value = parse_event_data(self.provider, event)?;
        if let Some(error_obj) = raw.get("error").filter(|e| !e.is_null()) {
            return Err(classify_error_object(
                self.provider,
                None,
                error_obj,
                raw.clone(),
            ));
        }

        let chunk: ChatCompletionChunk = serde_json::from_value(raw)?;
        Ok(chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content))
    }

    fn is_end_of_stream(&self, event: &Event) -> bool {
        event.data.trim() == "[DONE]"
    }
}
