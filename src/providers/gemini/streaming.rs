//! Gemini streaming implementation using eventsource-stream
//!
//! With `alt=sse`, every data payload is a complete `GenerateContentResponse`.
//! A fragment is the joined text of the first candidate's non-thought parts.

use eventsource_stream::Event;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LlmError, classify_error_object};
use crate::types::ProviderKind;
use crate::utils::streaming::{SseFragmentConverter, parse_event_data};

/// Gemini stream response structure
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiStreamResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    /// Thought summaries from thinking models are not answer text
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Finish reasons that mean the answer was withheld
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Gemini event converter
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiEventConverter;

impl GeminiEventConverter {
    pub fn new() -> Self {
        Self
    }

    fn extract_text(response: GeminiStreamResponse) -> Option<String> {
        let parts = response.candidates.into_iter().next()?.content?.parts;
        let text: String = parts
            .into_iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

impl SseFragmentConverter for GeminiEventConverter {
    fn convert_event(&self, event: &Event) -> Result<Option<String>, LlmError> {
        let raw: Value = parse_event_data(ProviderKind::Gemini, event)?;
        if let Some(error_obj) = raw.get("error").filter(|e| !e.is_null()) {
            return Err(classify_error_object(
                ProviderKind::Gemini,
                None,
                error_obj,
                raw.clone(),
            ));
        }

        let response: GeminiStreamResponse = serde_json::from_value(raw)?;
        if response.candidates.is_empty() {
            let block_reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref());
            if let Some(reason) = block_reason {
                return Err(LlmError::InvalidInput(format!("Prompt blocked: {reason}")));
            }
        }

        let finish_reason = response
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.clone());
        let text = Self::extract_text(response);
        if text.is_none() {
            if let Some(reason) =
                finish_reason.filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str()))
            {
                return Err(LlmError::InvalidInput(format!("Response blocked: {reason}")));
            }
        }
        Ok(text)
    }
}
