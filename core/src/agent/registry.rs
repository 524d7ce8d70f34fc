//! Tool registry
//!
//! Ordered name -> tool mapping owned by a single agent instance. Order is
//! registration order and is what the system prompt renders; registering a
//! name that already exists replaces the entry in place (last write wins).
//! Lookup is exact and case-sensitive; no name validation is performed, the
//! empty string is a legal (if degenerate) key.

use super::tool::Tool;

#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new, empty tool registry
    pub fn new() -> Self {
        ToolRegistry {
            entries: Vec::new(),
        }
    }

    /// Register a tool, replacing any existing entry with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.entries.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.entries[idx] = tool,
            None => self.entries.push(tool),
        }
    }

    /// Look up a tool by exact name
    pub fn resolve(&self, name: &str) -> Option<&dyn Tool> {
        self.entries
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// (name, description) pairs in registration order
    pub fn describe(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|t| (t.name(), t.description()))
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tool::FnTool;

    fn tool(name: &str, desc: &str, reply: &'static str) -> Box<dyn Tool> {
        Box::new(FnTool::new(name, desc, move |_| Ok(reply.to_string())))
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("b", "second letter", "b"));
        registry.register(tool("a", "first letter", "a"));
        registry.register(tool("c", "third letter", "c"));

        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        let described: Vec<(&str, &str)> = registry.describe().collect();
        assert_eq!(described[0], ("b", "second letter"));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("search", "find things", "ok"));
        assert!(registry.resolve("search").is_some());
        assert!(registry.resolve("Search").is_none());
        assert!(registry.resolve("searc").is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_position_and_drops_old_capability() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("first", "one", "1"));
        registry.register(tool("target", "old description", "old"));
        registry.register(tool("last", "three", "3"));

        registry.register(tool("target", "new description", "new"));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["first", "target", "last"]);

        let resolved = registry.resolve("target").unwrap();
        assert_eq!(resolved.description(), "new description");
        assert_eq!(resolved.call("").await.unwrap(), "new");
    }

    #[test]
    fn test_empty_name_is_a_legal_key() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("", "degenerate", "x"));
        assert!(registry.resolve("").is_some());
    }
}
