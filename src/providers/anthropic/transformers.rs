//! Anthropic Messages request body

use serde::Serialize;

use crate::defaults;

/// Streaming Messages API request
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    /// Always present; an absent instruction is sent as `""`
    pub system: &'a str,
    pub messages: Vec<MessageParam<'a>>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageParam<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    pub fn new(
        model: &'a str,
        prompt: &'a str,
        system_instruction: Option<&'a str>,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            model,
            max_tokens: max_tokens.unwrap_or(defaults::anthropic::MAX_TOKENS),
            system: system_instruction.unwrap_or(""),
            messages: vec![MessageParam {
                role: "user",
                content: prompt,
            }],
            stream: true,
        }
    }
}
