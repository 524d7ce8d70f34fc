//! `reagent-core` - ReAct agent framework core
//!
//! Implements the reasoning-and-acting loop: an LLM is driven through
//! repeated Thought / Action / Observation cycles until it produces a final
//! answer or runs out of iterations. The crate provides the loop itself,
//! the response-protocol parser, the tool registry, the provider interface
//! with concrete OpenAI/Anthropic/Google/Ollama backends, and two built-in
//! tools (calculator and web search).

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;

// Re-exports for convenience
pub use agent::core::ReactAgent;
pub use agent::tool::{FnTool, Tool};
pub use config::{AgentConfig, Settings};
pub use error::ReagentError;
pub use llm::{create_provider, Message, MessageRole, Provider};
