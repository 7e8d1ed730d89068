//! Agent - the assembled, immutable agent definition
//!
//! Hosting runtimes consume an [`AgentDefinition`]: identity, instruction,
//! model identifier and the final tool list. Nothing here talks to a model.

use super::agent_builder::AgentBuilder;
use crate::tools::{BaseTool, FunctionDeclaration};
use serde::Serialize;
use std::sync::Arc;

pub struct AgentDefinition {
    name: String,
    description: String,
    instruction: String,
    model: String,
    tools: Vec<Arc<dyn BaseTool>>,
}

impl AgentDefinition {
    /// Create a new agent builder - only requires instruction and model
    pub fn builder(instruction: impl Into<String>, model: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(instruction, model)
    }

    pub(super) fn from_parts(
        name: String,
        description: String,
        instruction: String,
        model: String,
        tools: Vec<Arc<dyn BaseTool>>,
    ) -> Self {
        Self {
            name,
            description,
            instruction,
            model,
            tools,
        }
    }

    // ===== Convenience Accessor Methods =====

    /// Get the agent's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the agent's description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the agent's instruction
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Model identifier the host should run this agent on
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn tools(&self) -> &[Arc<dyn BaseTool>] {
        &self.tools
    }

    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Look a tool up by exact name
    #[must_use]
    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn BaseTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Function declarations for every tool, in order
    #[must_use]
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.tools.iter().map(|t| t.declaration()).collect()
    }

    /// Serializable view without the tool objects themselves
    #[must_use]
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            model: self.model.clone(),
            instruction: self.instruction.clone(),
            tool_count: self.tools.len(),
            tools: self.tool_names().into_iter().map(str::to_string).collect(),
        }
    }
}

impl std::fmt::Debug for AgentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDefinition")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools_count", &self.tools.len())
            .finish_non_exhaustive()
    }
}

/// What `--print` emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub description: String,
    pub model: String,
    pub instruction: String,
    pub tool_count: usize,
    pub tools: Vec<String>,
}
