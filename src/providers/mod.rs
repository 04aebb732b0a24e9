//! Provider Adapters
//!
//! Each adapter turns a `(prompt, system_instruction)` pair into a lazy
//! [`FragmentStream`] of raw text for one provider. Adapters hold only the
//! credential-bound client and a model name; nothing else is shared between
//! requests.
//!
//! | Provider  | Endpoint                                   | Auth                 |
//! |-----------|--------------------------------------------|----------------------|
//! | OpenAI    | `POST {base}/chat/completions`             | `Authorization`      |
//! | Groq      | `POST {base}/chat/completions`             | `Authorization`      |
//! | Gemini    | `POST {base}/models/{m}:streamGenerateContent?alt=sse` | `x-goog-api-key` |
//! | Anthropic | `POST {base}/messages`                     | `x-api-key`          |

use std::sync::Arc;

use crate::error::LlmError;
use crate::types::ProviderKind;
use crate::utils::streaming::FragmentStream;

pub mod anthropic;
pub mod gemini;
pub mod groq;
pub mod openai;
pub mod openai_compatible;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use groq::GroqAdapter;
pub use openai::OpenAiAdapter;

/// Uniform streaming interface over a single model provider
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn provider(&self) -> ProviderKind;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Start a streaming completion.
    ///
    /// Returns immediately; the HTTP request is sent when the stream is first
    /// polled. Every call opens a new, independent request. Failures surface
    /// as the stream's final `Err` item rather than as a return value.
    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream;
}

impl<T: ProviderAdapter + ?Sized> ProviderAdapter for Box<T> {
    fn provider(&self) -> ProviderKind {
        (**self).provider()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        (**self).stream_completion(prompt, system_instruction)
    }
}

impl<T: ProviderAdapter + ?Sized> ProviderAdapter for Arc<T> {
    fn provider(&self) -> ProviderKind {
        (**self).provider()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn stream_completion(&self, prompt: &str, system_instruction: Option<&str>) -> FragmentStream {
        (**self).stream_completion(prompt, system_instruction)
    }
}

/// Reject a config built for a different provider
pub(crate) fn ensure_kind(
    config: &crate::config::ProviderConfig,
    expected: ProviderKind,
) -> Result<(), LlmError> {
    if config.kind != expected {
        return Err(LlmError::client_init(
            expected,
            format!("configuration is for {}, not {expected}", config.kind),
        ));
    }
    Ok(())
}

/// Re-tag construction failures as client initialization errors
pub(crate) fn init_error(provider: ProviderKind) -> impl Fn(LlmError) -> LlmError {
    move |e| {
        if e.is_client_init() {
            e
        } else {
            LlmError::client_init(provider, e.to_string())
        }
    }
}
