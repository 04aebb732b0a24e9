//! Streaming metrics wrapper
//!
//! [`MetricsStreamWrapper`] drives a [`ProviderAdapter`] and re-emits its
//! fragments as [`StreamEvent`]s, adding time-to-first-token and a final
//! throughput summary. Every call to
//! [`generate_stream`](MetricsStreamWrapper::generate_stream) has its own
//! clock and counter.
//!
//! Event order for one stream:
//!
//! ```text
//! Metric{ttft}?  (Content | Error)*  FinalMetrics
//! ```
//!
//! `Metric{ttft}` appears only if at least one fragment arrived, and always
//! before the first `Content`. `FinalMetrics` is always emitted, even when the
//! provider produced nothing.

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::providers::ProviderAdapter;
use crate::types::{FinalMetrics, ProviderKind, StreamEvent};
use crate::utils::streaming::EventStream;

/// How provider failures appear in the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorReporting {
    /// As a `Content` event whose text is the error message
    #[default]
    InBand,
    /// As a dedicated `StreamEvent::Error`
    Structured,
}

/// Lifecycle of one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    NotStarted,
    AwaitingFirstFragment,
    Streaming,
    Completed,
}

/// Timing and counting state for one stream
#[derive(Debug, Clone)]
pub struct StreamTracker {
    phase: StreamPhase,
    start: Option<Instant>,
    fragment_count: u64,
    summary: Option<FinalMetrics>,
}

impl StreamTracker {
    pub fn new() -> Self {
        Self {
            phase: StreamPhase::NotStarted,
            start: None,
            fragment_count: 0,
            summary: None,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn fragment_count(&self) -> u64 {
        self.fragment_count
    }

    /// Record the request start
    pub fn begin(&mut self, now: Instant) {
        if self.phase == StreamPhase::NotStarted {
            self.start = Some(now);
            self.phase = StreamPhase::AwaitingFirstFragment;
        }
    }

    /// Count one fragment. Returns the TTFT in seconds for the first one.
    pub fn record_fragment(&mut self, now: Instant) -> Option<f64> {
        match self.phase {
            StreamPhase::NotStarted => {
                self.begin(now);
                self.record_fragment(now)
            }
            StreamPhase::AwaitingFirstFragment => {
                self.fragment_count += 1;
                self.phase = StreamPhase::Streaming;
                Some(self.elapsed(now))
            }
            StreamPhase::Streaming => {
                self.fragment_count += 1;
                None
            }
            StreamPhase::Completed => None,
        }
    }

    /// Close the stream and produce its summary. Later calls return the same summary.
    pub fn finish(&mut self, now: Instant) -> FinalMetrics {
        if let Some(summary) = self.summary {
            return summary;
        }
        let total_time = self.start.map_or(0.0, |_| self.elapsed(now));
        let summary = FinalMetrics::new(total_time, self.fragment_count);
        self.summary = Some(summary);
        self.phase = StreamPhase::Completed;
        summary
    }

    fn elapsed(&self, now: Instant) -> f64 {
        self.start
            .map_or(0.0, |start| now.saturating_duration_since(start).as_secs_f64())
    }
}

impl Default for StreamTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps an adapter and instruments its fragment stream
#[derive(Clone)]
pub struct MetricsStreamWrapper {
    adapter: Arc<dyn ProviderAdapter>,
    error_reporting: ErrorReporting,
}

impl MetricsStreamWrapper {
    pub fn new(adapter: impl ProviderAdapter + 'static) -> Self {
        Self::from_shared(Arc::new(adapter))
    }

    pub fn from_shared(adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            adapter,
            error_reporting: ErrorReporting::default(),
        }
    }

    pub fn with_error_reporting(mut self, error_reporting: ErrorReporting) -> Self {
        self.error_reporting = error_reporting;
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.adapter.provider()
    }

    pub fn model(&self) -> &str {
        self.adapter.model()
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    /// Start an instrumented stream.
    ///
    /// Lazy like the adapter's: the clock starts and the request is issued
    /// when the returned stream is first polled.
    pub fn generate_stream(
        &self,
        prompt: impl Into<String>,
        system_instruction: Option<&str>,
    ) -> EventStream {
        let adapter = Arc::clone(&self.adapter);
        let prompt = prompt.into();
        let system_instruction = system_instruction.map(str::to_owned);
        let error_reporting = self.error_reporting;
        let stream_id = Uuid::new_v4();

        Box::pin(async_stream::stream! {
            let span = tracing::info_span!(
                "generate_stream",
                %stream_id,
                provider = %adapter.provider(),
                model = %adapter.model(),
            );
            let mut tracker = StreamTracker::new();
            tracker.begin(Instant::now());
            tracing::debug!(parent: &span, "Stream started");

            let mut fragments = adapter.stream_completion(&prompt, system_instruction.as_deref());
            while let Some(item) = fragments.next().await {
                if let Some(ttft) = tracker.record_fragment(Instant::now()) {
                    tracing::debug!(parent: &span, ttft, "First fragment received");
                    yield StreamEvent::ttft(ttft);
                }
                match item {
                    Ok(text) => {
                        yield StreamEvent::content(text);
                    }
                    Err(e) => {
                        tracing::warn!(parent: &span, error = %e, "Provider stream failed");
                        let message = e.to_string();
                        let event = match error_reporting {
                            ErrorReporting::InBand => StreamEvent::content(message),
                            ErrorReporting::Structured => StreamEvent::Error { message },
                        };
                        yield event;
                    }
                }
            }

            let summary = tracker.finish(Instant::now());
            tracing::info!(
                parent: &span,
                total_time = summary.total_time,
                fragment_count = summary.fragment_count,
                fragments_per_second = summary.fragments_per_second,
                "Stream completed"
            );
            yield StreamEvent::from(summary);
        })
    }
}

impl std::fmt::Debug for MetricsStreamWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsStreamWrapper")
            .field("provider", &self.adapter.provider())
            .field("model", &self.adapter.model())
            .field("error_reporting", &self.error_reporting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::types::MetricKey;
    use crate::utils::streaming::FragmentStream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    type Step = (Duration, Result<String, LlmError>);

    struct ScriptedAdapter {
        script: Vec<Step>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedAdapter {
        fn new(script: Vec<Step>) -> Self {
            Self {
                script,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ProviderAdapter for ScriptedAdapter {
        fn provider(&self) -> ProviderKind {
            ProviderKind::Groq
        }

        fn model(&self) -> &str {
            "scripted"
        }

        fn stream_completion(&self, _prompt: &str, _system: Option<&str>) -> FragmentStream {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let script = self.script.clone();
            Box::pin(async_stream::stream! {
                for (delay, item) in script {
                    tokio::time::sleep(delay).await;
                    yield item;
                }
            })
        }
    }

    fn ok(ms: u64, text: &str) -> Step {
        (Duration::from_millis(ms), Ok(text.to_string()))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    fn final_metrics(events: &[StreamEvent]) -> (f64, u64, f64) {
        match events.last() {
            Some(StreamEvent::FinalMetrics {
                total_time,
                fragment_count,
                fragments_per_second,
            }) => (*total_time, *fragment_count, *fragments_per_second),
            other => panic!("last event is not FinalMetrics: {other:?}"),
        }
    }

    #[test]
    fn tracker_walks_through_phases() {
        let t0 = Instant::now();
        let mut tracker = StreamTracker::new();
        assert_eq!(tracker.phase(), StreamPhase::NotStarted);
        tracker.begin(t0);
        assert_eq!(tracker.phase(), StreamPhase::AwaitingFirstFragment);
        let ttft = tracker.record_fragment(t0 + Duration::from_millis(250));
        assert!(close(ttft.unwrap(), 0.25));
        assert_eq!(tracker.phase(), StreamPhase::Streaming);
        assert_eq!(tracker.record_fragment(t0 + Duration::from_millis(300)), None);
        let summary = tracker.finish(t0 + Duration::from_secs(1));
        assert_eq!(tracker.phase(), StreamPhase::Completed);
        assert_eq!(summary.fragment_count, 2);
        assert!(close(summary.fragments_per_second, 2.0));
        assert_eq!(tracker.finish(t0 + Duration::from_secs(5)), summary);
    }

    #[tokio::test(start_paused = true)]
    async fn ttft_is_emitted_before_first_content() {
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(vec![
            ok(500, "Hel"),
            ok(100, "lo"),
        ]));
        let events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        assert_eq!(events.len(), 4);
        match &events[0] {
            StreamEvent::Metric { key, value } => {
                assert_eq!(*key, MetricKey::Ttft);
                assert!(close(*value, 0.5), "ttft was {value}");
            }
            other => panic!("expected ttft first, got {other:?}"),
        }
        assert_eq!(events[1], StreamEvent::content("Hel"));
        assert_eq!(events[2], StreamEvent::content("lo"));
        let (total, count, _) = final_metrics(&events);
        assert!(close(total, 0.6));
        assert_eq!(count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ten_fragments_over_two_seconds() {
        let script = (0..10).map(|i| ok(200, &format!("t{i}"))).collect();
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(script));
        let events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        let (total, count, fps) = final_metrics(&events);
        assert_eq!(count, 10);
        assert!(close(total, 2.0));
        assert!(close(fps, 5.0));
        let contents = events.iter().filter(|e| e.as_content().is_some()).count();
        assert_eq!(contents, 10);
    }

    #[tokio::test]
    async fn empty_stream_emits_only_final_metrics() {
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(Vec::new()));
        let events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        assert_eq!(events.len(), 1);
        let (_, count, fps) = final_metrics(&events);
        assert_eq!(count, 0);
        assert_eq!(fps, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn error_counts_as_a_fragment_in_band() {
        let err = LlmError::provider_stream(ProviderKind::Groq, LlmError::HttpError("reset".into()));
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(vec![
            ok(10, "a"),
            ok(10, "b"),
            ok(10, "c"),
            (Duration::from_millis(10), Err(err)),
        ]));
        let events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        let contents: Vec<&str> = events.iter().filter_map(StreamEvent::as_content).collect();
        assert_eq!(contents, vec!["a", "b", "c", "Error calling Groq: HTTP error: reset"]);
        assert_eq!(final_metrics(&events).1, 4);
    }

    #[tokio::test]
    async fn structured_mode_emits_error_events() {
        let err = LlmError::provider_stream(
            ProviderKind::Groq,
            LlmError::AuthenticationError("Invalid API Key".into()),
        );
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(vec![(Duration::ZERO, Err(err))]))
            .with_error_reporting(ErrorReporting::Structured);
        let events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StreamEvent::Metric { .. }));
        assert_eq!(
            events[1],
            StreamEvent::Error {
                message: "Error calling Groq: Authentication error: Invalid API Key".to_string()
            }
        );
        assert_eq!(final_metrics(&events).1, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn each_call_is_independent_and_lazy() {
        let adapter = ScriptedAdapter::new(vec![ok(100, "x")]);
        let calls = Arc::clone(&adapter.calls);
        let wrapper = MetricsStreamWrapper::new(adapter);

        let first = wrapper.generate_stream("one", None);
        let second = wrapper.generate_stream("two", Some("sys"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first: Vec<StreamEvent> = first.collect().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        let second: Vec<StreamEvent> = second.collect().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The second clock starts on its own first poll, not at creation.
        assert!(close(first[0].ttft_value().unwrap(), 0.1));
        assert!(close(second[0].ttft_value().unwrap(), 0.1));
        assert_eq!(final_metrics(&first).1, 1);
        assert_eq!(final_metrics(&second).1, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn completion_is_logged_with_metrics() {
        let wrapper = MetricsStreamWrapper::new(ScriptedAdapter::new(vec![
            ok(0, "a"),
            ok(0, "b"),
        ]));
        let _events: Vec<StreamEvent> = wrapper.generate_stream("hi", None).collect().await;

        assert!(logs_contain("First fragment received"));
        assert!(logs_contain("Stream completed"));
        assert!(logs_contain("fragment_count=2"));
        assert!(logs_contain("provider=Groq"));
    }
}
