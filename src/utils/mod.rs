//! Shared plumbing used by every provider adapter

pub mod http_client;
pub mod http_headers;
pub mod streaming;

pub use http_client::build_http_client;
pub use http_headers::{HttpHeaderBuilder, ProviderHeaders};
pub use streaming::{EventStream, FragmentStream, SseFragmentConverter, StreamFactory};
