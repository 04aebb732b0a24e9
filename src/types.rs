//! Core Types
//!
//! Provider identifiers and the normalized event protocol emitted by the
//! metrics wrapper.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::LlmError;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Groq,
    Gemini,
    Anthropic,
}

impl ProviderKind {
    /// All providers, in the order a selector would list them
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Groq,
        ProviderKind::Gemini,
        ProviderKind::Anthropic,
    ];

    /// Human-readable name used in logs and in-band error fragments
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Groq => "Groq",
            Self::Gemini => "Gemini",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Model used when the caller does not pick one
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => defaults::models::OPENAI,
            Self::Groq => defaults::models::GROQ,
            Self::Gemini => defaults::models::GEMINI,
            Self::Anthropic => defaults::models::ANTHROPIC,
        }
    }

    /// API root for the provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => defaults::base_urls::OPENAI,
            Self::Groq => defaults::base_urls::GROQ,
            Self::Gemini => defaults::base_urls::GEMINI,
            Self::Anthropic => defaults::base_urls::ANTHROPIC,
        }
    }

    /// Conventional environment variable holding this provider's key.
    ///
    /// Informational only: keys are always passed in explicitly.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "gemini" | "google" => Ok(Self::Gemini),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LlmError::ConfigurationError(format!(
                "Unknown provider '{other}'. Valid options: openai, groq, gemini, anthropic"
            ))),
        }
    }
}

/// Metric identifiers carried by [`StreamEvent::Metric`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    /// Time to first token, in seconds
    Ttft,
}

/// Normalized streaming event
///
/// Per stream: at most one `Metric { key: Ttft }`, emitted before any
/// `Content`/`Error`; exactly one `FinalMetrics`, always last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Timing metric
    Metric { key: MetricKey, value: f64 },
    /// Text fragment as delivered by the provider
    Content { value: String },
    /// Provider failure (only in structured error reporting mode)
    Error { message: String },
    /// Terminal summary
    FinalMetrics {
        total_time: f64,
        fragment_count: u64,
        fragments_per_second: f64,
    },
}

impl StreamEvent {
    pub fn ttft(seconds: f64) -> Self {
        Self::Metric {
            key: MetricKey::Ttft,
            value: seconds,
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self::Content {
            value: value.into(),
        }
    }

    /// Whether this is the terminal event of a stream
    pub fn is_final(&self) -> bool {
        matches!(self, Self::FinalMetrics { .. })
    }

    /// Seconds carried by a `Metric { key: Ttft }` event
    pub fn ttft_value(&self) -> Option<f64> {
        match self {
            Self::Metric {
                key: MetricKey::Ttft,
                value,
            } => Some(*value),
            _ => None,
        }
    }

    /// Text carried by a `Content` event
    pub fn as_content(&self) -> Option<&str> {
        match self {
            Self::Content { value } => Some(value),
            _ => None,
        }
    }
}

/// Summary of a completed stream
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinalMetrics {
    /// Seconds from request start to stream exhaustion
    pub total_time: f64,
    /// Number of fragments observed (approximate token count)
    pub fragment_count: u64,
    /// `fragment_count / total_time`, or 0 when no time elapsed
    pub fragments_per_second: f64,
}

impl FinalMetrics {
    pub fn new(total_time: f64, fragment_count: u64) -> Self {
        Self {
            total_time,
            fragment_count,
            fragments_per_second: fragments_per_second(fragment_count, total_time),
        }
    }
}

impl From<FinalMetrics> for StreamEvent {
    fn from(m: FinalMetrics) -> Self {
        StreamEvent::FinalMetrics {
            total_time: m.total_time,
            fragment_count: m.fragment_count,
            fragments_per_second: m.fragments_per_second,
        }
    }
}

/// Throughput with a zero-duration guard
pub fn fragments_per_second(fragment_count: u64, total_time: f64) -> f64 {
    if total_time > 0.0 {
        fragment_count as f64 / total_time
    } else {
        0.0
    }
}
