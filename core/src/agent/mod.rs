//! Agent module - the ReAct loop and its collaborators

pub mod core;
pub mod history;
pub mod parser;
pub mod registry;
pub mod tool;
pub mod tools;
pub mod transcript;

pub use core::ReactAgent;
pub use history::{HistoryEntry, StepOutcome};
pub use parser::{parse_response, ParsedStep};
pub use registry::ToolRegistry;
pub use tool::{FnTool, Tool};
pub use transcript::Transcript;
