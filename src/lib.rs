//! # llm-arena - Streaming latency comparison for LLM providers
//!
//! Sends one prompt to two providers at once and measures, per stream, the
//! time to first fragment and the fragment throughput.
//!
#![deny(unsafe_code)]

//! ## Layers
//!
//! - **Provider adapters** ([`providers`]): one flat adapter per provider
//!   (OpenAI, Groq, Gemini, Anthropic) behind the [`ProviderAdapter`] trait,
//!   each producing a lazy stream of raw text fragments.
//! - **Metrics wrapper** ([`metrics`]): turns fragments into [`StreamEvent`]s
//!   with TTFT and final throughput.
//! - **Arena** ([`arena`]): drives two wrappers concurrently and folds each
//!   stream into a [`RunReport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_arena::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LlmError> {
//!     let groq = build_adapter(ProviderKind::Groq, "gsk_...")?;
//!     let openai = build_adapter(ProviderKind::OpenAi, "sk-...")?;
//!
//!     let arena = Arena::new(
//!         MetricsStreamWrapper::from_shared(groq.into()),
//!         MetricsStreamWrapper::from_shared(openai.into()),
//!     );
//!     let report = arena.compare("Explain SSE in one line", None).await;
//!     println!("{:?} answered first", report.faster_first_fragment());
//!     Ok(())
//! }
//! ```

pub mod arena;
pub mod config;
pub mod defaults;
pub mod error;
pub mod factory;
pub mod metrics;
pub mod providers;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use arena::{Arena, ComparisonReport, RunReport, Side};
pub use config::{HttpConfig, ProviderConfig};
pub use error::LlmError;
pub use factory::{AdapterBuilder, build_adapter, build_adapter_from_config, try_build_adapter};
pub use metrics::{ErrorReporting, MetricsStreamWrapper, StreamPhase, StreamTracker};
pub use providers::ProviderAdapter;
pub use types::{FinalMetrics, MetricKey, ProviderKind, StreamEvent};
pub use utils::streaming::{EventStream, FragmentStream};

/// Commonly used items
pub mod prelude {
    pub use crate::arena::{Arena, ComparisonReport, RunReport, Side};
    pub use crate::config::{HttpConfig, ProviderConfig};
    pub use crate::error::LlmError;
    pub use crate::factory::{AdapterBuilder, build_adapter, try_build_adapter};
    pub use crate::metrics::{ErrorReporting, MetricsStreamWrapper};
    pub use crate::providers::ProviderAdapter;
    pub use crate::types::{FinalMetrics, ProviderKind, StreamEvent};
    pub use crate::utils::streaming::{EventStream, FragmentStream};
}
