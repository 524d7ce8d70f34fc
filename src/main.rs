//! `reagent` - ReAct agents in your terminal
//!
//! Thin CLI over `reagent-core`: builds an agent with the built-in search
//! and calculator tools, runs it against a question, and presents the
//! answer. Fatal failures (provider errors, tool panics) surface here at
//! the anyhow boundary.

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;

use reagent_core::agent::tools::{CalculatorTool, SearchTool};
use reagent_core::llm::factory::parse_spec;
use reagent_core::{create_provider, ReactAgent, Settings, Tool};

use crate::cli::{Cli, Commands};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load configuration")?;

    match &cli.command {
        Commands::Ask {
            question,
            verbose,
            max_iterations,
        } => {
            let question = question.join(" ");
            if question.trim().is_empty() {
                anyhow::bail!("No question given");
            }
            let mut agent = build_agent(&cli, &settings, *max_iterations)?;
            ask(&mut agent, &question, *verbose).await?;
        }

        Commands::Interactive { verbose } => {
            interactive(&cli, &settings, *verbose).await?;
        }

        Commands::Tools => {
            let bold = Style::new().bold();
            println!("{}", bold.apply_to("Built-in tools:"));
            for tool in builtin_tools()? {
                println!(
                    "  {} - {}",
                    Style::new().cyan().apply_to(tool.name()),
                    tool.description()
                );
            }
        }
    }

    Ok(())
}

/// Build an agent over the configured provider with the built-in tools
fn build_agent(
    cli: &Cli,
    settings: &Settings,
    max_iterations: Option<usize>,
) -> Result<ReactAgent> {
    let spec = cli
        .provider
        .clone()
        .unwrap_or_else(|| settings.provider.clone());
    let api_key = resolve_api_key(cli, settings, &spec)?;

    let provider = create_provider(&spec, api_key)
        .with_context(|| format!("Failed to create provider for '{}'", spec))?;

    let mut config = settings.agent.clone();
    if let Some(max_iterations) = max_iterations {
        config = config.with_max_iterations(max_iterations);
    }

    let mut agent = ReactAgent::new(config, provider);
    for tool in builtin_tools()? {
        agent.register(tool);
    }
    Ok(agent)
}

/// The tools every agent gets. Needs no provider and no credentials.
fn builtin_tools() -> Result<Vec<Box<dyn Tool>>> {
    Ok(vec![Box::new(SearchTool::new()?), Box::new(CalculatorTool)])
}

/// Resolve the API key explicitly: flag, then config file, then the
/// provider's conventional environment variable. The library itself never
/// reads the environment.
fn resolve_api_key(cli: &Cli, settings: &Settings, spec: &str) -> Result<Option<String>> {
    if let Some(key) = &cli.api_key {
        return Ok(Some(key.clone()));
    }
    if let Some(key) = &settings.api_key {
        return Ok(Some(key.clone()));
    }
    let (kind, _model) = parse_spec(spec)?;
    Ok(kind.api_key_var().and_then(|var| std::env::var(var).ok()))
}

/// Ask one question and print the styled answer
async fn ask(agent: &mut ReactAgent, question: &str, verbose: bool) -> Result<()> {
    let cyan = Style::new().cyan().bold();
    let green = Style::new().green().bold();
    let dim = Style::new().dim();

    println!("\n{} {}", cyan.apply_to("Question:"), question);
    if !verbose {
        println!("{}", dim.apply_to("Processing..."));
    }

    let answer = agent.run(question, verbose).await?;

    println!("\n{} {}\n", green.apply_to("Answer:"), answer);
    Ok(())
}

/// Interactive REPL: a fresh agent per question, like the one-shot path
async fn interactive(cli: &Cli, settings: &Settings, verbose: bool) -> Result<()> {
    let bold = Style::new().bold();
    println!("{}", bold.apply_to("reagent interactive mode"));
    println!("Type your questions, or 'exit' to leave.\n");

    loop {
        let question: String = dialoguer::Input::new()
            .with_prompt("Question")
            .allow_empty(true)
            .interact_text()?;

        let trimmed = question.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Bye!");
            break;
        }

        let mut agent = build_agent(cli, settings, None)?;
        match ask(&mut agent, trimmed, verbose).await {
            Ok(()) => {}
            Err(e) => {
                let red = Style::new().red().bold();
                println!("\n{} {:#}\n", red.apply_to("Error:"), e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tools_need_no_credentials() {
        let tools = builtin_tools().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["search", "calculate"]);
        for tool in &tools {
            assert!(!tool.description().is_empty());
        }
    }
}
