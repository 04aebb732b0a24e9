//! Side-by-side comparison
//!
//! An [`Arena`] runs the same prompt against two instrumented adapters
//! concurrently. The two pipelines share nothing; each is folded into a
//! [`RunReport`] as its events arrive.

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsStreamWrapper;
use crate::types::{FinalMetrics, ProviderKind, StreamEvent};
use crate::utils::streaming::EventStream;

/// Accumulated result of one instrumented stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub provider: ProviderKind,
    pub model: String,
    pub started_at: DateTime<Utc>,
    /// Concatenated `Content` values, in arrival order
    pub text: String,
    pub ttft: Option<f64>,
    pub metrics: FinalMetrics,
    /// Messages from structured `Error` events
    pub errors: Vec<String>,
}

impl RunReport {
    fn empty(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            started_at: Utc::now(),
            text: String::new(),
            ttft: None,
            metrics: FinalMetrics::default(),
            errors: Vec::new(),
        }
    }

    /// Drain `events` into a report
    pub async fn collect(provider: ProviderKind, model: impl Into<String>, events: EventStream) -> Self {
        Self::collect_with(provider, model, events, |_| {}).await
    }

    /// Drain `events` into a report, passing each event to `on_event` first.
    ///
    /// Lets a caller render text incrementally while the report is built.
    pub async fn collect_with<F>(
        provider: ProviderKind,
        model: impl Into<String>,
        mut events: EventStream,
        mut on_event: F,
    ) -> Self
    where
        F: FnMut(&StreamEvent),
    {
        let mut report = Self::empty(provider, model);
        while let Some(event) = events.next().await {
            on_event(&event);
            report.apply(event);
        }
        report
    }

    fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Metric { value, .. } => self.ttft = Some(value),
            StreamEvent::Content { value } => self.text.push_str(&value),
            StreamEvent::Error { message } => self.errors.push(message),
            StreamEvent::FinalMetrics {
                total_time,
                fragment_count,
                fragments_per_second,
            } => {
                self.metrics = FinalMetrics {
                    total_time,
                    fragment_count,
                    fragments_per_second,
                }
            }
        }
    }
}

/// Which side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Both reports of one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub left: RunReport,
    pub right: RunReport,
}

impl ComparisonReport {
    /// Side with the lower TTFT. `None` on a tie or if either side produced nothing.
    pub fn faster_first_fragment(&self) -> Option<Side> {
        let (left, right) = (self.left.ttft?, self.right.ttft?);
        pick(left, right, |a, b| a < b)
    }

    /// Side with the higher fragments per second. `None` on a tie.
    pub fn higher_throughput(&self) -> Option<Side> {
        pick(
            self.left.metrics.fragments_per_second,
            self.right.metrics.fragments_per_second,
            |a, b| a > b,
        )
    }
}

fn pick(left: f64, right: f64, better: impl Fn(f64, f64) -> bool) -> Option<Side> {
    if better(left, right) {
        Some(Side::Left)
    } else if better(right, left) {
        Some(Side::Right)
    } else {
        None
    }
}

/// Two contenders answering the same prompt
#[derive(Debug, Clone)]
pub struct Arena {
    left: MetricsStreamWrapper,
    right: MetricsStreamWrapper,
}

impl Arena {
    pub fn new(left: MetricsStreamWrapper, right: MetricsStreamWrapper) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &MetricsStreamWrapper {
        &self.left
    }

    pub fn right(&self) -> &MetricsStreamWrapper {
        &self.right
    }

    /// Open both instrumented streams without driving them
    pub fn streams(&self, prompt: &str, system_instruction: Option<&str>) -> (EventStream, EventStream) {
        (
            self.left.generate_stream(prompt, system_instruction),
            self.right.generate_stream(prompt, system_instruction),
        )
    }

    /// Run both sides concurrently to completion
    pub async fn compare(&self, prompt: &str, system_instruction: Option<&str>) -> ComparisonReport {
        tracing::info!(
            left = %self.left.provider(),
            right = %self.right.provider(),
            "Starting comparison"
        );
        let (left_events, right_events) = self.streams(prompt, system_instruction);
        let (left, right) = tokio::join!(
            RunReport::collect(self.left.provider(), self.left.model(), left_events),
            RunReport::collect(self.right.provider(), self.right.model(), right_events),
        );
        ComparisonReport { left, right }
    }
}
