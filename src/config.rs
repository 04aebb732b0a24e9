//! Adapter configuration
//!
//! `ProviderConfig` bundles everything an adapter needs: the credential, the
//! endpoint, the model and HTTP behaviour. Keys are always supplied
//! explicitly by the caller.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::defaults;
use crate::error::LlmError;
use crate::types::ProviderKind;

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout. `None` lets a stream run as long as the provider keeps it open.
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    /// Returns a builder for constructing `HttpConfig`
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for `HttpConfig`
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration, filling unset fields from the defaults
    pub fn build(self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout.or(defaults.timeout),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            headers: self.headers,
            user_agent: self.user_agent.or(defaults.user_agent),
        }
    }
}

// Durations are (de)serialized as whole seconds
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

/// Configuration for a single provider adapter
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    /// Output cap. Anthropic always sends one, falling back to its default.
    pub max_tokens: Option<u32>,
    pub http_config: HttpConfig,
}

impl ProviderConfig {
    /// Configuration with the provider's default endpoint and model
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: SecretString::from(api_key.into()),
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            max_tokens: match kind {
                ProviderKind::Anthropic => Some(defaults::anthropic::MAX_TOKENS),
                _ => None,
            },
            http_config: HttpConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Base URL without a trailing slash
    pub fn endpoint_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check the configuration before any client is built.
    ///
    /// Failures are reported as [`LlmError::ClientInit`].
    pub fn validate(&self) -> Result<(), LlmError> {
        let key = self.api_key.expose_secret();
        if key.trim().is_empty() {
            return Err(LlmError::client_init(self.kind, "API key is empty"));
        }
        if key.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(LlmError::client_init(
                self.kind,
                "API key contains whitespace or control characters",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::client_init(self.kind, "Model name is empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LlmError::client_init(
                self.kind,
                format!("Base URL must be http(s): {}", self.base_url),
            ));
        }
        if self.max_tokens == Some(0) {
            return Err(LlmError::client_init(self.kind, "max_tokens must be positive"));
        }
        Ok(())
    }
}
