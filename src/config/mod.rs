//! Configuration for the GitHub agent: settings layering and secret lookup.

pub mod env_resolver;
pub mod settings;

pub use env_resolver::{EnvKey, EnvResolverFn, default_env_resolver};
pub use settings::AgentSettings;
