//! GitHub API agent
//!
//! Builds an agent definition whose tools are generated from GitHub's
//! published OpenAPI description:
//!
//! 1. load the description from disk ([`tools::openapi::read_api_spec`])
//! 2. build the `Authorization` credential from a token in the environment
//! 3. generate one tool per operation ([`tools::OpenApiToolSet`])
//! 4. keep the tools matching GitHub keywords, up to a cap ([`tools::select_tools`])
//! 5. assemble the [`AgentDefinition`]
//!
//! [`runtime::run_bootstrap`] drives the async build from synchronous code,
//! with or without an active Tokio runtime.
//!
//! ```no_run
//! use github_agent::{AgentSettings, create_github_agent, runtime::run_bootstrap};
//!
//! let settings = AgentSettings::default();
//! let timeout = settings.bootstrap_timeout();
//! let agent = run_bootstrap(move || async move { create_github_agent(&settings).await }, timeout);
//! ```

pub mod agents;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod tools;

pub use agents::{AgentDefinition, AgentSummary, create_github_agent, create_github_agent_with};
pub use config::AgentSettings;
pub use errors::{AgentError, AgentResult};
