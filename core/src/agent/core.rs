//! ReAct agent loop
//!
//! Drives a provider through think/act/observe cycles until the model
//! issues the finish action or the iteration budget runs out. The loop is
//! strictly sequential; the provider round trip is the only suspension
//! point and nothing is parsed before it completes.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Local};

use super::history::{HistoryEntry, StepOutcome};
use super::parser::{
    parse_response, ACTION_INPUT_MARKER, ACTION_MARKER, FINISH_ACTION, OBSERVATION_MARKER,
    THOUGHT_MARKER,
};
use super::registry::ToolRegistry;
use super::tool::{FnTool, Tool};
use super::transcript::Transcript;
use crate::config::AgentConfig;
use crate::llm::{Message, Provider};

/// Returned when the finish action carries no input
pub const NO_ANSWER_SENTINEL: &str = "No answer provided";

/// Returned when the iteration budget is exhausted without a finish action
pub const EXHAUSTED_MESSAGE: &str =
    "Maximum number of iterations reached without conclusive answer.";

/// Corrective re-prompt sent when a response has no usable action line
const FORMAT_REMINDER: &str =
    "Please provide an Action and Action Input following the specified format.";

/// The ReAct agent: provider + tool registry + execution history.
///
/// Owns its registry and history exclusively; create one agent per
/// concurrent conversation. History accumulates across successive runs on
/// the same instance until [`clear_history`](Self::clear_history) is called.
pub struct ReactAgent {
    config: AgentConfig,
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
    history: Vec<HistoryEntry>,
    execution_date: DateTime<Local>,
}

impl ReactAgent {
    /// Create a new agent over the given provider
    pub fn new(config: AgentConfig, provider: Box<dyn Provider>) -> Self {
        ReactAgent {
            config,
            provider,
            registry: ToolRegistry::new(),
            history: Vec::new(),
            execution_date: Local::now(),
        }
    }

    /// Pin the execution date rendered into the default instructions
    pub fn with_execution_date(mut self, date: DateTime<Local>) -> Self {
        self.execution_date = date;
        self
    }

    /// Register a plain closure as a tool.
    ///
    /// Registering a name that already exists replaces the previous entry.
    /// Tools must be registered before `run`; the registry is not meant to
    /// change mid-loop.
    pub fn register_tool<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        capability: F,
    ) where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        self.registry
            .register(Box::new(FnTool::new(name, description, capability)));
    }

    /// Register a full tool implementation
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.registry.register(tool);
    }

    /// Registered tools as a name -> description map
    pub fn list_tools(&self) -> HashMap<String, String> {
        self.registry
            .describe()
            .map(|(name, desc)| (name.to_string(), desc.to_string()))
            .collect()
    }

    /// Defensive copy of the execution history
    pub fn get_history(&self) -> Vec<HistoryEntry> {
        self.history.clone()
    }

    /// Clear the execution history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Model identifier of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Run the agent on a query and return its final answer.
    ///
    /// `verbose` prints the intermediate reasoning to stdout; it changes
    /// neither control flow nor the returned value. Provider failures and
    /// tool failures propagate out of this call and abort the run.
    pub async fn run(&mut self, query: &str, verbose: bool) -> Result<String> {
        let mut transcript = Transcript::new(self.system_prompt(), query);

        for iteration in 1..=self.config.max_iterations {
            if verbose {
                println!("\n{}", "=".repeat(60));
                println!("ITERATION {}", iteration);
                println!("{}", "=".repeat(60));
            }

            let response = self
                .provider
                .generate(transcript.messages(), self.config.temperature)
                .await?;

            tracing::debug!(iteration, bytes = response.len(), "provider response");
            if verbose {
                println!("\n{}", response);
            }

            let step = parse_response(&response);

            // No usable action: tolerant retry. The malformed response and a
            // corrective nudge go into the transcript, the iteration is
            // spent, and nothing is recorded in history.
            let action = match step.action.as_deref() {
                None | Some("") => {
                    transcript.push(Message::assistant(&response));
                    transcript.push(Message::user(FORMAT_REMINDER));
                    tracing::debug!(iteration, "no action line, re-prompting");
                    continue;
                }
                Some(action) => action.to_string(),
            };

            transcript.push(Message::assistant(&response));

            if action.eq_ignore_ascii_case(FINISH_ACTION) {
                let answer = step
                    .action_input
                    .clone()
                    .filter(|input| !input.is_empty())
                    .unwrap_or_else(|| NO_ANSWER_SENTINEL.to_string());
                self.history.push(HistoryEntry {
                    iteration,
                    thought: step.thought,
                    action,
                    action_input: step.action_input,
                    outcome: StepOutcome::FinalAnswer(answer.clone()),
                });
                tracing::debug!(iteration, "finish action, run complete");
                return Ok(answer);
            }

            let observation = match self.registry.resolve(&action) {
                Some(tool) => Some(tool.call(step.action_input.as_deref().unwrap_or("")).await?),
                None => None,
            };

            match observation {
                Some(observation) => {
                    if verbose {
                        if observation.chars().count() > 200 {
                            let preview: String = observation.chars().take(200).collect();
                            println!("\nObservation: {}...", preview);
                        } else {
                            println!("\nObservation: {}", observation);
                        }
                    }
                    transcript.push(Message::user(format!(
                        "{} {}",
                        OBSERVATION_MARKER, observation
                    )));
                    self.history.push(HistoryEntry {
                        iteration,
                        thought: step.thought,
                        action,
                        action_input: step.action_input,
                        outcome: StepOutcome::Observation(observation),
                    });
                }
                None => {
                    // Unknown tool: fed back to the model as an observation,
                    // but not recorded in history. Keep the asymmetry.
                    let error = format!(
                        "Tool '{}' not found. Available tools: {}",
                        action,
                        self.registry.names().join(", ")
                    );
                    if verbose {
                        println!("\nObservation: {}", error);
                    }
                    tracing::debug!(iteration, action = %action, "unknown tool");
                    transcript.push(Message::user(format!("{} {}", OBSERVATION_MARKER, error)));
                }
            }
        }

        Ok(EXHAUSTED_MESSAGE.to_string())
    }

    /// Build the system prompt: instructions, the tool list in registration
    /// order, and the directive format block the parser recognizes.
    fn system_prompt(&self) -> String {
        let instructions = match &self.config.instructions {
            Some(custom) => custom.clone(),
            None => self.default_instructions(),
        };

        let tools_desc = self
            .registry
            .describe()
            .map(|(name, desc)| format!("- {}: {}", name, desc))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{instructions}\n\
            \n\
            Available tools:\n\
            {tools_desc}\n\
            \n\
            You must follow this format EXACTLY:\n\
            \n\
            {thought} [your reasoning about what to do]\n\
            {action} [tool name]\n\
            {action_input} [input for the tool]\n\
            \n\
            You will receive:\n\
            \n\
            {observation} [action result]\n\
            \n\
            Continue this cycle until you can answer. When you have the final answer, use:\n\
            \n\
            {thought} [final reasoning]\n\
            {action} {finish}\n\
            {action_input} [your final answer]\n\
            \n\
            IMPORTANT:\n\
            - Use EXACTLY the names \"{thought}\", \"{action}\", \"{action_input}\", \"{observation}\"\n\
            - Always start with a Thought\n\
            - Each action must have an input\n\
            - Use \"{finish}\" when you have the complete answer",
            instructions = instructions,
            tools_desc = tools_desc,
            thought = THOUGHT_MARKER,
            action = ACTION_MARKER,
            action_input = ACTION_INPUT_MARKER,
            observation = OBSERVATION_MARKER,
            finish = FINISH_ACTION,
        )
    }

    fn default_instructions(&self) -> String {
        format!(
            "You are {}.\n\
            \n\
            Description: {}\n\
            \n\
            Execution date: {}\n\
            Provider: {}\n\
            \n\
            You are a ReAct (Reasoning + Acting) agent that solves problems by alternating between thinking and acting.",
            self.config.name,
            self.config.description,
            self.execution_date.format("%Y-%m-%d %H:%M:%S"),
            self.provider.model_name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::llm::MessageRole;

    /// Pops canned responses and snapshots every transcript it is handed.
    #[derive(Clone)]
    struct ScriptedProvider {
        inner: Arc<ScriptInner>,
    }

    struct ScriptInner {
        responses: Mutex<VecDeque<String>>,
        transcripts: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            ScriptedProvider {
                inner: Arc::new(ScriptInner {
                    responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                    transcripts: Mutex::new(Vec::new()),
                }),
            }
        }

        fn transcripts(&self) -> Vec<Vec<Message>> {
            self.inner.transcripts.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            self.inner.transcripts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn generate(&self, messages: &[Message], _temperature: f32) -> Result<String> {
            self.inner
                .transcripts
                .lock()
                .unwrap()
                .push(messages.to_vec());
            self.inner
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn agent_with(script: &ScriptedProvider, max_iterations: usize) -> ReactAgent {
        let config = AgentConfig::default().with_max_iterations(max_iterations);
        ReactAgent::new(config, Box::new(script.clone()))
    }

    fn register_echo(agent: &mut ReactAgent) {
        agent.register_tool("echo", "Returns the input unchanged", |input: &str| {
            Ok(input.to_string())
        });
    }

    #[tokio::test]
    async fn test_finish_returns_answer_and_records_one_entry() {
        let script = ScriptedProvider::new(&["Thought: done\nAction: finish\nAction Input: 42"]);
        let mut agent = agent_with(&script, 10);

        let answer = agent.run("what is the answer?", false).await.unwrap();
        assert_eq!(answer, "42");

        let history = agent.get_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].iteration, 1);
        assert_eq!(history[0].action, "finish");
        assert_eq!(history[0].thought.as_deref(), Some("done"));
        assert_eq!(history[0].final_answer(), Some("42"));
    }

    #[tokio::test]
    async fn test_finish_is_case_insensitive() {
        let script = ScriptedProvider::new(&["Action: FINISH\nAction Input: done"]);
        let mut agent = agent_with(&script, 10);
        assert_eq!(agent.run("q", false).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_finish_without_input_returns_sentinel() {
        let script = ScriptedProvider::new(&["Thought: eh\nAction: finish"]);
        let mut agent = agent_with(&script, 10);

        let answer = agent.run("q", false).await.unwrap();
        assert_eq!(answer, NO_ANSWER_SENTINEL);
        assert_eq!(agent.get_history()[0].final_answer(), Some(NO_ANSWER_SENTINEL));
    }

    #[tokio::test]
    async fn test_unknown_tool_feeds_error_observation_without_history() {
        let script = ScriptedProvider::new(&[
            "Thought: try it\nAction: foo\nAction Input: x",
            "Thought: ok\nAction: finish\nAction Input: ok",
        ]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);
        agent.register_tool("calc", "Does math", |_| Ok("0".to_string()));

        let answer = agent.run("q", false).await.unwrap();
        assert_eq!(answer, "ok");

        // Only the finish step made it into history.
        let history = agent.get_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, "finish");
        assert_eq!(history[0].iteration, 2);

        // The second provider call saw the synthesized observation.
        let transcripts = script.transcripts();
        let last = transcripts[1].last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert!(last.content.starts_with("Observation: "));
        assert!(last.content.contains("Tool 'foo' not found"));
        assert!(last.content.contains("echo, calc"));
    }

    #[tokio::test]
    async fn test_reprompt_cycles_then_exhaustion_sentinel() {
        let script = ScriptedProvider::new(&["no directives here", "still nothing"]);
        let mut agent = agent_with(&script, 2);

        let answer = agent.run("q", false).await.unwrap();
        assert_eq!(answer, EXHAUSTED_MESSAGE);
        assert!(agent.get_history().is_empty());

        // Two full re-prompt cycles: the second call sees the bootstrap pair
        // plus one assistant + one corrective user message.
        assert_eq!(script.calls(), 2);
        let transcripts = script.transcripts();
        assert_eq!(transcripts[0].len(), 2);
        assert_eq!(transcripts[1].len(), 4);
        assert_eq!(transcripts[1][2].role, MessageRole::Assistant);
        assert_eq!(transcripts[1][2].content, "no directives here");
        assert_eq!(transcripts[1][3].role, MessageRole::User);
        assert_eq!(transcripts[1][3].content, FORMAT_REMINDER);
    }

    #[tokio::test]
    async fn test_empty_action_counts_as_malformed() {
        let script = ScriptedProvider::new(&["Action:", "Action: finish\nAction Input: ok"]);
        let mut agent = agent_with(&script, 10);

        assert_eq!(agent.run("q", false).await.unwrap(), "ok");
        let transcripts = script.transcripts();
        assert_eq!(transcripts[1][3].content, FORMAT_REMINDER);
        assert_eq!(agent.get_history().len(), 1);
    }

    #[tokio::test]
    async fn test_echo_end_to_end() {
        let script = ScriptedProvider::new(&[
            "Thought: t\nAction: echo\nAction Input: hi",
            "Thought: done\nAction: finish\nAction Input: hi",
        ]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);

        let answer = agent.run("q", false).await.unwrap();
        assert_eq!(answer, "hi");

        let history = agent.get_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].iteration, 1);
        assert_eq!(history[0].action, "echo");
        assert_eq!(history[0].action_input.as_deref(), Some("hi"));
        assert_eq!(history[0].observation(), Some("hi"));
        assert_eq!(history[1].iteration, 2);
        assert_eq!(history[1].final_answer(), Some("hi"));

        let transcripts = script.transcripts();
        assert_eq!(transcripts[0].len(), 2);
        assert_eq!(transcripts[1].len(), 4);
        assert_eq!(transcripts[1][3].content, "Observation: hi");
    }

    #[tokio::test]
    async fn test_system_prompt_lists_tools_and_format() {
        let script = ScriptedProvider::new(&["Action: finish\nAction Input: x"]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);

        agent.run("q", false).await.unwrap();

        let transcripts = script.transcripts();
        let system = &transcripts[0][0];
        assert_eq!(system.role, MessageRole::System);
        assert!(system.content.contains("- echo: Returns the input unchanged"));
        assert!(system.content.contains("Thought:"));
        assert!(system.content.contains("Action Input:"));
        assert!(system.content.contains("Use \"finish\""));
        assert!(system.content.contains("Provider: scripted"));
    }

    #[tokio::test]
    async fn test_tool_failure_aborts_run() {
        let script = ScriptedProvider::new(&["Action: boom\nAction Input: x"]);
        let mut agent = agent_with(&script, 10);
        agent.register_tool("boom", "Always fails", |_| anyhow::bail!("exploded"));

        let err = agent.run("q", false).await.unwrap_err();
        assert!(err.to_string().contains("exploded"));
        assert!(agent.get_history().is_empty());
    }

    #[tokio::test]
    async fn test_history_accumulates_across_runs_until_cleared() {
        let script = ScriptedProvider::new(&[
            "Action: finish\nAction Input: one",
            "Action: finish\nAction Input: two",
        ]);
        let mut agent = agent_with(&script, 10);

        agent.run("first", false).await.unwrap();
        agent.run("second", false).await.unwrap();

        let history = agent.get_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].final_answer(), Some("one"));
        assert_eq!(history[1].final_answer(), Some("two"));
        // Iteration numbering restarts per run.
        assert_eq!(history[1].iteration, 1);

        // get_history is a defensive copy and idempotent.
        let again = agent.get_history();
        assert_eq!(history, again);
        let mut mutated = agent.get_history();
        mutated.clear();
        assert_eq!(agent.get_history().len(), 2);

        agent.clear_history();
        assert!(agent.get_history().is_empty());
    }

    #[tokio::test]
    async fn test_reregistering_tool_replaces_capability() {
        let script = ScriptedProvider::new(&[
            "Action: dup\nAction Input: x",
            "Action: finish\nAction Input: done",
        ]);
        let mut agent = agent_with(&script, 10);
        agent.register_tool("dup", "old", |_| Ok("old output".to_string()));
        agent.register_tool("dup", "new", |_| Ok("new output".to_string()));

        agent.run("q", false).await.unwrap();

        let history = agent.get_history();
        assert_eq!(history[0].observation(), Some("new output"));
        assert_eq!(agent.list_tools().get("dup").map(String::as_str), Some("new"));
    }

    #[tokio::test]
    async fn test_verbose_does_not_change_result() {
        let script = ScriptedProvider::new(&[
            "Thought: t\nAction: echo\nAction Input: hi",
            "Action: finish\nAction Input: hi",
        ]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);

        assert_eq!(agent.run("q", true).await.unwrap(), "hi");
        assert_eq!(agent.get_history().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_action_input_dispatches_empty_string() {
        let script = ScriptedProvider::new(&[
            "Thought: t\nAction: echo",
            "Action: finish\nAction Input: done",
        ]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);

        agent.run("q", false).await.unwrap();

        let history = agent.get_history();
        assert_eq!(history[0].observation(), Some(""));
        assert_eq!(history[0].action_input, None);
    }

    #[tokio::test]
    async fn test_list_tools_maps_names_to_descriptions() {
        let script = ScriptedProvider::new(&[]);
        let mut agent = agent_with(&script, 10);
        register_echo(&mut agent);

        let tools = agent.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(
            tools.get("echo").map(String::as_str),
            Some("Returns the input unchanged")
        );
    }
}
