//! Common Streaming Utilities
//!
//! Every supported provider streams Server-Sent Events. `StreamFactory` sends
//! the request, decodes the SSE body with `eventsource-stream` and hands each
//! event to a provider-specific [`SseFragmentConverter`], producing a lazy
//! [`FragmentStream`].
//!
//! Fragment streams uphold three rules:
//!
//! - no `Ok` item is ever an empty string;
//! - at most one `Err` item is produced and it is always the last item;
//! - the request is only sent once the stream is first polled.

use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;

use crate::error::{LlmError, classify_http_error};
use crate::types::{ProviderKind, StreamEvent};

/// Lazy, single-pass sequence of raw text fragments from one provider request
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Normalized event sequence produced by the metrics wrapper
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Converts provider SSE events into text fragments
pub trait SseFragmentConverter: Send + Sync {
    /// Text carried by `event`, if any.
    ///
    /// An `Err` ends the stream; it is reported as the stream's final item.
    fn convert_event(&self, event: &Event) -> Result<Option<String>, LlmError>;

    /// Whether `event` marks the end of the provider's stream
    fn is_end_of_stream(&self, _event: &Event) -> bool {
        false
    }
}

/// Stream factory for provider fragment streams
pub struct StreamFactory;

impl StreamFactory {
    /// Create a lazy fragment stream for an SSE endpoint.
    ///
    /// Transport failures, non-success responses, malformed SSE framing and
    /// converter errors are all surfaced as a single terminal
    /// [`LlmError::ProviderStream`] item.
    pub fn create_fragment_stream<C>(
        provider: ProviderKind,
        request: reqwest::RequestBuilder,
        converter: C,
    ) -> FragmentStream
    where
        C: SseFragmentConverter + 'static,
    {
        Box::pin(async_stream::stream! {
            let response = match Self::send_streaming_request(provider, request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(provider = %provider, error = %e, "Streaming request failed");
                    yield Err(LlmError::provider_stream(provider, e));
                    return;
                }
            };

            let mut events = Box::pin(response.bytes_stream().eventsource());
            while let Some(item) = events.next().await {
                let event = match item {
                    Ok(event) => event,
                    Err(EventStreamError::Transport(e)) => {
                        tracing::warn!(provider = %provider, error = %e, "Connection lost mid-stream");
                        yield Err(LlmError::provider_stream(provider, LlmError::from(e)));
                        return;
                    }
                    Err(e) => {
                        tracing::warn!(provider = %provider, error = %e, "SSE decoding failed");
                        yield Err(LlmError::provider_stream(
                            provider,
                            LlmError::StreamError(format!("SSE parsing error: {e}")),
                        ));
                        return;
                    }
                };

                if converter.is_end_of_stream(&event) {
                    break;
                }
                if event.data.trim().is_empty() {
                    continue;
                }

                match converter.convert_event(&event) {
                    Ok(Some(text)) if !text.is_empty() => {
                        yield Ok(text);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(provider = %provider, error = %e, "Provider reported an error mid-stream");
                        yield Err(LlmError::provider_stream(provider, e));
                        return;
                    }
                }
            }
        })
    }

    async fn send_streaming_request(
        provider: ProviderKind,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, LlmError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(provider, status.as_u16(), &body));
        }
        Ok(response)
    }
}

/// Parse an SSE data payload into a provider chunk type
pub(crate) fn parse_event_data<T>(provider: ProviderKind, event: &Event) -> Result<T, LlmError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str::<T>(&event.data)
        .map_err(|e| LlmError::ParseError(format!("Failed to parse {provider} event: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_data_reports_provider() {
        let event = Event {
            event: String::new(),
            data: "{not json".to_string(),
            id: String::new(),
            retry: None,
        };
        let err = parse_event_data::<serde_json::Value>(ProviderKind::Gemini, &event).unwrap_err();
        assert!(err.to_string().contains("Failed to parse Gemini event"));
    }
}
