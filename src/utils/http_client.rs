//! HTTP client construction

use crate::config::HttpConfig;
use crate::error::LlmError;

/// Build a `reqwest::Client` honouring the timeouts and user agent of `config`
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|e| LlmError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_with_defaults() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn builds_with_timeouts() {
        let cfg = HttpConfig::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(1))
            .user_agent("arena-test/1.0")
            .build();
        assert!(build_http_client(&cfg).is_ok());
    }
}
