//! Anthropic Provider
//!
//! Streams through the Messages API (`POST {base}/messages`).

use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::types::ProviderKind;
use crate::utils::streaming::{FragmentStream, StreamFactory};
use crate::utils::{ProviderHeaders, build_http_client};

use super::{ProviderAdapter, ensure_kind, init_error};

pub mod streaming;
pub mod transformers;

pub use streaming::AnthropicEventConverter;
use transformers::MessagesRequest;

/// Streaming adapter for Anthropic
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    config: ProviderConfig,
    http_client: reqwest::Client,
    headers: HeaderMap,
}

impl AnthropicAdapter {
    /// Adapter with the default endpoint and model (`claude-3-5-sonnet-20240620`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_config(ProviderConfig::new(ProviderKind::Anthropic, api_key))
    }

    pub fn from_config(config: ProviderConfig) -> Result<Self, LlmError> {
        ensure_kind(&config, ProviderKind::Anthropic)?;
        config.validate()?;
        let headers =
            ProviderHeaders::anthropic(config.api_key.expose_secret(), &config.http_config.headers)
                .map_err(init_error(ProviderKind::Anthropic))?;
        let http_client =
            build_http_client(&config.http_config).map_err(init_error(ProviderKind::Anthropic))?;

        tracing::debug!(model = %config.model, base_url = %config.endpoint_root(), "Anthropic client initialized");

        Ok(Self {
            config,
            http_client,
            headers,
        })
    }

    /// Output cap sent with every request
    pub fn max_tokens(&self) -> u32 {
        self.config
            .max_tokens
            .unwrap_or(crate::defaults::anthropic::MAX_TOKENS)
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        let body = MessagesRequest::new(
            &self.config.model,
            prompt,
            system_instruction,
            Some(self.max_tokens()),
        );
        let url = format!("{}/messages", self.config.endpoint_root());
        tracing::debug!(model = %self.config.model, url = %url, "Preparing Anthropic stream");

        let request = self
            .http_client
            .post(url)
            .headers(self.headers.clone())
            .json(&body);

        StreamFactory::create_fragment_stream(
            ProviderKind::Anthropic,
            request,
            AnthropicEventConverter::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let adapter = AnthropicAdapter::new("sk-ant-test").unwrap();
        assert_eq!(adapter.model(), "claude-3-5-sonnet-20240620");
        assert_eq!(adapter.max_tokens(), 1024);
    }

    #[test]
    fn empty_key_fails() {
        let err = AnthropicAdapter::new("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to initialize Anthropic client: API key is empty"
        );
    }
}
