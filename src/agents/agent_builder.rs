//! Agent Builder - Mutable builder for creating immutable agent definitions

use super::AgentDefinition;
use crate::tools::BaseTool;
use std::sync::Arc;

/// Builder for constructing [`AgentDefinition`] instances with a fluent API
pub struct AgentBuilder {
    instruction: String,
    model: String,
    name: String,
    description: String,
    tools: Vec<Arc<dyn BaseTool>>,
}

impl AgentBuilder {
    /// Create a new builder with only required fields
    pub fn new(instruction: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            model: model.into(),
            name: String::new(),
            description: String::new(),
            tools: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a single tool - accepts owned tool, wraps in Arc
    #[must_use]
    pub fn with_tool(mut self, tool: impl BaseTool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Add multiple tools at once, keeping their order
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Arc<dyn BaseTool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Build the final immutable agent definition
    #[must_use]
    pub fn build(self) -> AgentDefinition {
        AgentDefinition::from_parts(
            self.name,
            self.description,
            self.instruction,
            self.model,
            self.tools,
        )
    }
}
