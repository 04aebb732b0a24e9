//! Default values shared across providers

pub mod http {
    use std::time::Duration;

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub const USER_AGENT: &str = concat!("llm-arena/", env!("CARGO_PKG_VERSION"));
}

pub mod models {
    pub const OPENAI: &str = "gpt-4o";
    pub const GROQ: &str = "llama-3.3-70b-versatile";
    pub const GEMINI: &str = "gemini-2.5-flash";
    pub const ANTHROPIC: &str = "claude-3-5-sonnet-20240620";
}

pub mod base_urls {
    pub const OPENAI: &str = "https://api.openai.com/v1";
    pub const GROQ: &str = "https://api.groq.com/openai/v1";
    pub const GEMINI: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const ANTHROPIC: &str = "https://api.anthropic.com/v1";
}

pub mod anthropic {
    /// Anthropic requires an explicit output cap
    pub const MAX_TOKENS: u32 = 1024;

    pub const API_VERSION: &str = "2023-06-01";
}
