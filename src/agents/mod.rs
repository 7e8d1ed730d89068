pub mod agent;
pub mod agent_builder;
pub mod github;

pub use agent::{AgentDefinition, AgentSummary};
pub use agent_builder::AgentBuilder;
pub use github::{create_github_agent, create_github_agent_with};
