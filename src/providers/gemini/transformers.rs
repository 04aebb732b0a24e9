//! Gemini request body

use serde_json::{Value, json};

/// Build a `streamGenerateContent` body.
///
/// The system instruction travels in the top-level `systemInstruction` field,
/// never as a conversation turn.
pub fn build_generate_content_request(
    prompt: &str,
    system_instruction: Option<&str>,
    max_tokens: Option<u32>,
) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [{ "text": prompt }] }
        ]
    });
    if let Some(system) = system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    if let Some(max_tokens) = max_tokens {
        body["generationConfig"] = json!({ "maxOutputTokens": max_tokens });
    }
    body
}
