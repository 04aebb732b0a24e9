//! OpenAI-compatible Chat Completions
//!
//! OpenAI and Groq expose the same streaming `chat/completions` surface and
//! differ only in endpoint, key and default model. [`ChatCompletionsClient`]
//! carries the shared request and SSE handling; the provider adapters wrap it.

use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::types::ProviderKind;
use crate::utils::streaming::{FragmentStream, StreamFactory};
use crate::utils::{ProviderHeaders, build_http_client};

use super::init_error;

pub mod streaming;
pub mod transformers;

pub use streaming::ChatCompletionsEventConverter;

/// Credential-bound client for a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    config: ProviderConfig,
    http_client: reqwest::Client,
    headers: HeaderMap,
}

impl ChatCompletionsClient {
    /// Validate `config` and build the HTTP client. No request is sent.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let provider = config.kind;
        config.validate()?;
        let headers =
            ProviderHeaders::openai_compatible(config.api_key.expose_secret(), &config.http_config.headers)
                .map_err(init_error(provider))?;
        let http_client = build_http_client(&config.http_config).map_err(init_error(provider))?;

        tracing::debug!(
            provider = %provider,
            model = %config.model,
            base_url = %config.endpoint_root(),
            "Chat completions client initialized"
        );

        Ok(Self {
            config,
            http_client,
            headers,
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.config.kind
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint_root())
    }

    /// Open a lazy streaming completion
    pub fn stream_chat(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        let provider = self.config.kind;
        let body = transformers::build_chat_request(
            &self.config.model,
            prompt,
            system_instruction,
            self.config.max_tokens,
        );
        let url = self.chat_url();
        tracing::debug!(provider = %provider, model = %self.config.model, url = %url, "Preparing chat completions stream");

        let request = self
            .http_client
            .post(url)
            .headers(self.headers.clone())
            .json(&body);

        StreamFactory::create_fragment_stream(
            provider,
            request,
            ChatCompletionsEventConverter::new(provider),
        )
    }
}
