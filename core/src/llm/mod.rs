//! LLM provider module
//!
//! Provides the abstract `Provider` interface the agent loop consumes and
//! concrete implementations for several backends:
//! - OpenAI-compatible API (OpenAI, Ollama, LM Studio, local models)
//! - Anthropic Messages API (Claude)
//! - Google Generative AI (Gemini)

pub mod anthropic;
pub mod chat;
pub mod factory;
pub mod google;
pub mod openai;

pub use chat::{Message, MessageRole};
pub use factory::{create_provider, ProviderKind};

use anyhow::Result;
use async_trait::async_trait;

/// Abstract LLM capability consumed by the agent loop.
///
/// One call is one synchronous request/response round trip: the complete
/// response text is returned, no streaming contract is assumed.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a response for the given transcript at the given temperature
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String>;

    /// The model identifier, used for descriptive purposes only
    fn model_name(&self) -> &str;
}

/// Connection settings shared by the concrete providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API endpoint base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// API key (if the backend requires one)
    pub api_key: Option<String>,
    /// Maximum tokens in the response
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Create a new provider config
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        ProviderConfig {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            max_tokens: 4096,
        }
    }

    /// Set the response token cap
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

/// Build the shared HTTP client used by the concrete providers
pub(crate) fn http_client() -> Result<reqwest::Client> {
    use anyhow::Context;
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .context("Failed to build HTTP client")
}
