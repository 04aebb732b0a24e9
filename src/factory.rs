//! Adapter construction
//!
//! Callers pick a provider at runtime and receive a boxed
//! [`ProviderAdapter`]. Keys are always passed in explicitly.

use secrecy::SecretString;
use std::time::Duration;

use crate::config::{HttpConfig, ProviderConfig};
use crate::error::LlmError;
use crate::providers::{
    AnthropicAdapter, GeminiAdapter, GroqAdapter, OpenAiAdapter, ProviderAdapter,
};
use crate::types::ProviderKind;

/// Build an adapter with the provider's default endpoint and model
pub fn build_adapter(
    kind: ProviderKind,
    api_key: impl Into<String>,
) -> Result<Box<dyn ProviderAdapter>, LlmError> {
    build_adapter_from_config(ProviderConfig::new(kind, api_key))
}

/// Build an adapter, treating a missing or blank key as "provider unavailable"
pub fn try_build_adapter(
    kind: ProviderKind,
    api_key: Option<&str>,
) -> Result<Option<Box<dyn ProviderAdapter>>, LlmError> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => build_adapter(kind, key).map(Some),
        _ => {
            tracing::debug!(provider = %kind, "No API key supplied; provider unavailable");
            Ok(None)
        }
    }
}

pub fn build_adapter_from_config(
    config: ProviderConfig,
) -> Result<Box<dyn ProviderAdapter>, LlmError> {
    let adapter: Box<dyn ProviderAdapter> = match config.kind {
        ProviderKind::OpenAi => Box::new(OpenAiAdapter::from_config(config)?),
        ProviderKind::Groq => Box::new(GroqAdapter::from_config(config)?),
        ProviderKind::Gemini => Box::new(GeminiAdapter::from_config(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicAdapter::from_config(config)?),
    };
    Ok(adapter)
}

/// Fluent builder over [`ProviderConfig`]
#[derive(Debug, Clone)]
pub struct AdapterBuilder {
    config: ProviderConfig,
}

impl AdapterBuilder {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            config: ProviderConfig::new(kind, String::new()),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = SecretString::from(api_key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config = self.config.with_model(model);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config = self.config.with_max_tokens(max_tokens);
        self
    }

    pub fn http_config(mut self, http_config: HttpConfig) -> Self {
        self.config = self.config.with_http_config(http_config);
        self
    }

    /// Whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http_config.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .http_config
            .headers
            .insert(name.into(), value.into());
        self
    }

    pub fn into_config(self) -> ProviderConfig {
        self.config
    }

    pub fn build(self) -> Result<Box<dyn ProviderAdapter>, LlmError> {
        build_adapter_from_config(self.config)
    }
}

impl ProviderKind {
    /// Start building an adapter for this provider
    pub fn builder(self) -> AdapterBuilder {
        AdapterBuilder::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_provider() {
        for kind in ProviderKind::ALL {
            let adapter = build_adapter(kind, "test-key").unwrap();
            assert_eq!(adapter.provider(), kind);
            assert_eq!(adapter.model(), kind.default_model());
        }
    }

    #[test]
    fn missing_or_blank_key_means_unavailable() {
        assert!(try_build_adapter(ProviderKind::Groq, None).unwrap().is_none());
        assert!(try_build_adapter(ProviderKind::Groq, Some("  ")).unwrap().is_none());
        assert!(try_build_adapter(ProviderKind::Groq, Some("gsk_x")).unwrap().is_some());
    }

    #[test]
    fn malformed_key_is_a_client_init_error() {
        let result = try_build_adapter(ProviderKind::OpenAi, Some("sk bad"));
        assert!(matches!(result, Err(ref e) if e.is_client_init()));
    }

    #[test]
    fn builder_overrides_defaults() {
        let adapter = ProviderKind::Anthropic
            .builder()
            .api_key("sk-ant")
            .model("claude-3-haiku-20240307")
            .base_url("http://localhost:3000/v1")
            .max_tokens(64)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(adapter.model(), "claude-3-haiku-20240307");
    }

    #[test]
    fn builder_without_key_fails() {
        let err = AdapterBuilder::new(ProviderKind::Gemini)
            .build()
            .err()
            .expect("building without a key must fail");
        assert!(err.is_client_init());
    }

    #[test]
    fn builder_collects_headers() {
        let config = ProviderKind::Groq
            .builder()
            .api_key("gsk")
            .header("x-team", "arena")
            .into_config();
        assert_eq!(config.http_config.headers.get("x-team").map(String::as_str), Some("arena"));
    }
}
