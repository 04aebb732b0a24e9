//! Chat Completions request body

use serde_json::{Value, json};

/// Build a streaming `chat/completions` body.
///
/// The system instruction, when given, is sent as a leading `system` message.
pub fn build_chat_request(
    model: &str,
    prompt: &str,
    system_instruction: Option<&str>,
    max_tokens: Option<u32>,
) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_instruction {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": prompt }));

    let mut body = json!({
        "model": model,
        "messages": messages,
        "stream": true,
    });
    if let Some(max_tokens) = max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    body
}
