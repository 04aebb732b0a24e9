//! Google Gemini Provider
//!
//! Streams through the Generative Language API:
//! `POST {base}/models/{model}:streamGenerateContent?alt=sse`.

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

pub use streaming::GeminiEventConverter;

/// Streaming adapter for Gemini
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    config: ProviderConfig,
    http_client: reqwest::Client,
    headers: HeaderMap,
}

impl GeminiAdapter {
    /// Adapter with the default endpoint and model (`gemini-2.5-flash`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_config(ProviderConfig::new(ProviderKind::Gemini, api_key))
    }

    pub fn from_config(config: ProviderConfig) -> Result<Self, LlmError> {
        ensure_kind(&config, ProviderKind::Gemini)?;
        config.validate()?;
        let headers =
            ProviderHeaders::gemini(config.api_key.expose_secret(), &config.http_config.headers)
                .map_err(init_error(ProviderKind::Gemini))?;
        let http_client =
            build_http_client(&config.http_config).map_err(init_error(ProviderKind::Gemini))?;

        tracing::debug!(model = %config.model, base_url = %config.endpoint_root(), "Gemini client initialized");

        Ok(Self {
            config,
            http_client,
            headers,
        })
    }

    fn stream_url(&self) -> String {
        let model = self
            .config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model);
        format!(
            "{}/models/{model}:streamGenerateContent?alt=sse",
            self.config.endpoint_root()
        )
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        let body = transformers::build_generate_content_request(
            prompt,
            system_instruction,
            self.config.max_tokens,
        );
        let url = self.stream_url();
        tracing::debug!(model = %self.config.model, url = %url, "Preparing Gemini stream");

        let request = self
            .http_client
            .post(url)
            .headers(self.headers.clone())
            .json(&body);

        StreamFactory::create_fragment_stream(ProviderKind::Gemini, request, GeminiEventConverter::new())
    }
}
