use anyhow::Result;
use async_trait::async_trait;

/// A trait for tools that can be executed by the agent.
///
/// Tools are the primary way the agent interacts with the world.
/// Each tool must implement this trait and be `Send + Sync` to be used in
/// the agentic loop. A failure returned from `call` is not caught by the
/// loop: it aborts the whole run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (e.g., "search")
    fn name(&self) -> &str;

    /// A brief description of what the tool does
    fn description(&self) -> &str;

    /// Execute the tool with the provided input
    async fn call(&self, input: &str) -> Result<String>;
}

/// Adapter turning a plain closure into a [`Tool`].
///
/// This is how `ReactAgent::register_tool(name, description, capability)`
/// accepts bare functions.
pub struct FnTool {
    name: String,
    description: String,
    func: Box<dyn Fn(&str) -> Result<String> + Send + Sync>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        FnTool {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, input: &str) -> Result<String> {
        (self.func)(input)
    }
}
