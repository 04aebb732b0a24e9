//! Anthropic streaming implementation using eventsource-stream
//!
//! The Messages API emits typed events (`message_start`,
//! `content_block_start`, `content_block_delta`, `ping`, `message_delta`,
//! `message_stop`, `error`). Only text deltas carry answer text.

use eventsource_stream::Event;
use serde::Deserialize;

use crate::error::{LlmError, classify_error_object};
use crate::types::ProviderKind;
use crate::utils::streaming::{SseFragmentConverter, parse_event_data};

/// Anthropic stream event
#[derive(Debug, Clone, Deserialize)]
struct AnthropicStreamEvent {
    #[serde(rename = "type")]
    r#type: String,
    #[serde(default)]
    delta: Option<AnthropicDelta>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicDelta {
    #[serde(rename = "type", default)]
    r#type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic event converter
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicEventConverter;

impl AnthropicEventConverter {
    pub fn new() -> Self {
        Self
    }
}

impl SseFragmentConverter for AnthropicEventConverter {
    fn convert_event(&self, event: &Event) -> Result<Option<String>, LlmError> {
        let parsed: AnthropicStreamEvent = parse_event_data(ProviderKind::Anthropic, event)?;
        match parsed.r#type.as_str() {
            "content_block_delta" => Ok(parsed
                .delta
                .filter(|delta| matches!(delta.r#type.as_deref(), None | Some("text_delta")))
                .and_then(|delta| delta.text)),
            "error" => {
                let error_obj = parsed.error.unwrap_or_default();
                Err(classify_error_object(
                    ProviderKind::Anthropic,
                    None,
                    &error_obj,
                    error_obj.clone(),
                ))
            }
            _ => Ok(None),
        }
    }

    fn is_end_of_stream(&self, event: &Event) -> bool {
        event.event == "message_stop"
    }
}
