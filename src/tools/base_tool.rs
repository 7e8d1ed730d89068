use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Function declaration that describes a tool's interface to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value, // JSON Schema for parameters
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn parameters(&self) -> &Value {
        &self.parameters
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub data: Value,
    pub error_message: Option<String>,
}

impl ToolResult {
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error_message: None,
        }
    }

    #[must_use]
    pub const fn error(message: String) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error_message: Some(message),
        }
    }
}

/// Core trait for all tools handed to the agent.
#[async_trait]
pub trait BaseTool: Send + Sync {
    /// The name of the tool - must be unique within an agent
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does
    fn description(&self) -> &str;

    /// Describes the tool's interface to the LLM.
    fn declaration(&self) -> FunctionDeclaration;

    /// Executes the tool with the given arguments.
    async fn run_async(&self, args: HashMap<String, Value>) -> ToolResult;
}
