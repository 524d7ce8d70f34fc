//! Built-in tools

pub mod calculator;
pub mod search;

pub use calculator::CalculatorTool;
pub use search::SearchTool;
