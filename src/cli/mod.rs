//! Command-line interface definitions

use clap::{Parser, Subcommand};

/// ReAct agent framework - reasoning and acting agents in your terminal
#[derive(Parser)]
#[command(name = "reagent", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Provider spec: a bare OpenAI model name ("gpt-4o-mini") or a
    /// prefixed spec ("anthropic://claude-3-5-sonnet-20241022",
    /// "google://gemini-1.5-flash", "ollama://llama3.2")
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// API key for the provider (falls back to reagent.toml, then the
    /// provider's conventional environment variable)
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the agent a single question
    Ask {
        /// The question to answer
        question: Vec<String>,

        /// Show the reasoning process step by step
        #[arg(short, long)]
        verbose: bool,

        /// Maximum number of agent iterations
        #[arg(short = 'i', long)]
        max_iterations: Option<usize>,
    },

    /// Interactive mode - ask multiple questions in sequence
    Interactive {
        /// Show the reasoning process step by step
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the built-in tools
    Tools,
}
