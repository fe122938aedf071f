use std::collections::BTreeMap;

use serde_json::Value;

use super::types::{Tool, ToolError, ToolSchema};

/// Tools offered to the agent, keyed by name. Built once, then read-only.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Tool) -> Result<(), ToolError> {
        let name = tool.name();
        if self.tools.contains_key(name) {
            return Err(ToolError::AlreadyRegistered(name.to_string()));
        }
        self.tools.insert(name.to_string(), tool);
        Ok(())
    }

    pub fn execute(&self, name: &str, args: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(args)
    }

    pub fn get_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(Tool::schema).collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }
}
