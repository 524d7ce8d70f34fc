//! Execution history
//!
//! One entry per completed iteration: either a tool call with its
//! observation, or the finishing step with the final answer. Re-prompt
//! iterations and unknown-tool iterations record nothing - that asymmetry
//! is inherited behavior and is pinned down by the loop tests.

use serde::Serialize;

/// What an iteration produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Result text returned by a tool
    Observation(String),
    /// Final answer delivered via the finish action
    FinalAnswer(String),
}

/// Record of one loop iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// 1-based iteration number within the run
    pub iteration: usize,
    /// Reasoning text, when the model provided one
    pub thought: Option<String>,
    /// Action name as the model wrote it
    pub action: String,
    /// Raw action input line, when present
    pub action_input: Option<String>,
    /// Observation or final answer
    pub outcome: StepOutcome,
}

impl HistoryEntry {
    /// The final answer, if this entry finished the run
    pub fn final_answer(&self) -> Option<&str> {
        match &self.outcome {
            StepOutcome::FinalAnswer(answer) => Some(answer),
            StepOutcome::Observation(_) => None,
        }
    }

    /// The tool observation, if this entry was a tool call
    pub fn observation(&self) -> Option<&str> {
        match &self.outcome {
            StepOutcome::Observation(obs) => Some(obs),
            StepOutcome::FinalAnswer(_) => None,
        }
    }
}
