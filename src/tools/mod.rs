//! Tools and toolsets for the GitHub agent.
//!
//! - [`BaseTool`]: a single callable operation
//! - [`BaseToolset`]: a producer of tools
//! - [`openapi`]: tools generated from an OpenAPI description
//! - [`selection`]: the keyword filter and cap applied before the agent sees them

pub mod base_tool;
pub mod base_toolset;
pub mod openapi;
pub mod selection;

pub use base_tool::{BaseTool, FunctionDeclaration, ToolResult};
pub use base_toolset::BaseToolset;
pub use openapi::{AuthConfig, OpenApiToolSet};
pub use selection::{
    DEFAULT_GITHUB_KEYWORDS, DEFAULT_TOOL_LIMIT, KeywordSet, SelectionPolicy, ToolName,
    ToolSelection, select_tools,
};
