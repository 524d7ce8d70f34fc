//! Provider factory
//!
//! Maps a provider spec string to a concrete `Provider` implementation.
//! Specs use an explicit scheme prefix, e.g. "anthropic://claude-3-5-sonnet"
//! or "ollama://llama3.2"; a bare model name means OpenAI. API keys are
//! passed in by the caller, never read from the environment here.

use anyhow::Result;

use super::{
    anthropic::AnthropicProvider, google::GoogleProvider, openai::OpenAiProvider, Provider,
    ProviderConfig,
};
use crate::error::ReagentError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Backend family selected by a provider spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
    /// Google Generative AI (Gemini)
    Google,
    /// Local Ollama server (OpenAI-compatible endpoint)
    Ollama,
}

impl std::str::FromStr for ProviderKind {
    type Err = ReagentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "google" | "gemini" => Ok(ProviderKind::Google),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(ReagentError::UnknownProviderScheme(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "OpenAI"),
            ProviderKind::Anthropic => write!(f, "Anthropic"),
            ProviderKind::Google => write!(f, "Google Generative AI"),
            ProviderKind::Ollama => write!(f, "Ollama"),
        }
    }
}

impl ProviderKind {
    /// Default API base URL for this backend
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => OPENAI_BASE_URL,
            ProviderKind::Anthropic => ANTHROPIC_BASE_URL,
            ProviderKind::Google => GOOGLE_BASE_URL,
            ProviderKind::Ollama => OLLAMA_BASE_URL,
        }
    }

    /// Conventional environment variable carrying the API key.
    ///
    /// The library never reads it; the CLI uses this name to resolve a key
    /// explicitly at the boundary.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Google => Some("GOOGLE_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

/// Split a provider spec into its backend kind and model name.
///
/// "anthropic://claude-3-5-sonnet" -> (Anthropic, "claude-3-5-sonnet");
/// a spec without "://" selects OpenAI with the whole string as the model.
pub fn parse_spec(spec: &str) -> Result<(ProviderKind, String), ReagentError> {
    match spec.split_once("://") {
        Some((scheme, model)) => {
            let kind: ProviderKind = scheme.parse()?;
            Ok((kind, model.to_string()))
        }
        None => Ok((ProviderKind::OpenAi, spec.to_string())),
    }
}

/// Create a provider from a spec string and an optional API key
pub fn create_provider(spec: &str, api_key: Option<String>) -> Result<Box<dyn Provider>> {
    let (kind, model) = parse_spec(spec)?;
    let config = ProviderConfig::new(kind.default_base_url(), model, api_key);

    let provider: Box<dyn Provider> = match kind {
        ProviderKind::OpenAi | ProviderKind::Ollama => Box::new(OpenAiProvider::new(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config)?),
        ProviderKind::Google => Box::new(GoogleProvider::new(config)?),
    };

    Ok(provider)
}
