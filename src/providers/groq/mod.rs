//! `Groq` Provider
//!
//! Groq serves an OpenAI-compatible API at `https://api.groq.com/openai/v1`.

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::types::ProviderKind;
use crate::utils::streaming::FragmentStream;

use super::openai_compatible::ChatCompletionsClient;
use super::{ProviderAdapter, ensure_kind};

/// Streaming adapter for Groq
#[derive(Debug, Clone)]
pub struct GroqAdapter {
    client: ChatCompletionsClient,
}

impl GroqAdapter {
    /// Adapter with the default endpoint and model (`llama-3.3-70b-versatile`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_config(ProviderConfig::new(ProviderKind::Groq, api_key))
    }

    pub fn from_config(config: ProviderConfig) -> Result<Self, LlmError> {
        ensure_kind(&config, ProviderKind::Groq)?;
        Ok(Self {
            client: ChatCompletionsClient::new(config)?,
        })
    }
}

impl ProviderAdapter for GroqAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        self.client.stream_chat(prompt, system_instruction)
    }
}
