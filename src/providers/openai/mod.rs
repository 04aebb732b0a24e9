//! OpenAI Provider

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::types::ProviderKind;
use crate::utils::streaming::FragmentStream;

use super::openai_compatible::ChatCompletionsClient;
use super::{ProviderAdapter, ensure_kind};

/// Streaming adapter for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    client: ChatCompletionsClient,
}

impl OpenAiAdapter {
    /// Adapter with the default endpoint and model (`gpt-4o`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_config(ProviderConfig::new(ProviderKind::OpenAi, api_key))
    }

    pub fn from_config(config: ProviderConfig) -> Result<Self, LlmError> {
        ensure_kind(&config, ProviderKind::OpenAi)?;
        Ok(Self {
            client: ChatCompletionsClient::new(config)?,
        })
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        self.client.stream_chat(prompt, system_instruction)
    }
}
