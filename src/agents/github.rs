//! The GitHub agent factory
//!
//! Resolves the token, loads the OpenAPI description, generates one tool
//! per operation, applies the keyword filter and cap, and assembles the
//! [`AgentDefinition`]. Each step fails with its own [`AgentError`] variant.

use super::AgentDefinition;
use crate::config::{AgentSettings, EnvResolverFn};
use crate::errors::{AgentError, AgentResult};
use crate::tools::openapi::{AuthConfig, OpenApiSpec, OpenApiToolSet, read_api_spec};
use crate::tools::{BaseTool, BaseToolset};
use std::sync::Arc;

const TOOLSET_NAME: &str = "github_api";

/// Build the GitHub agent, reading the token from the process environment.
///
/// # Errors
/// Returns the error of the first stage that fails; see
/// [`AgentError::stage`].
pub async fn create_github_agent(settings: &AgentSettings) -> AgentResult<AgentDefinition> {
    create_github_agent_with(settings, None).await
}

/// Build the GitHub agent, resolving the token through `resolver` when given.
#[tracing::instrument(
    name = "github_agent.create",
    skip_all,
    fields(spec = %settings.spec_path.display(), model = %settings.model)
)]
pub async fn create_github_agent_with(
    settings: &AgentSettings,
    resolver: Option<&EnvResolverFn>,
) -> AgentResult<AgentDefinition> {
    let token = settings.token_key().resolve_with(resolver)?;

    if !settings.spec_path.exists() {
        return Err(AgentError::SpecIo {
            path: settings.spec_path.display().to_string(),
            reason: "GitHub API spec file not found".to_string(),
        });
    }

    let document = read_api_spec(&settings.spec_path)?;
    let auth = AuthConfig::from_token(&token, &settings.auth_prefix);
    let spec = OpenApiSpec::from_value(document)?;

    let toolset = OpenApiToolSet::from_spec(TOOLSET_NAME, spec, Some(auth))?;
    let all_tools: Vec<Arc<dyn BaseTool>> = toolset.get_tools().await;
    if all_tools.is_empty() {
        return Err(AgentError::NoTools {
            reason: "No tools found in GitHub API spec".to_string(),
        });
    }
    tracing::info!("Found {} total GitHub API tools", all_tools.len());

    let selection = settings.selection_policy().select(all_tools)?;
    tracing::info!("Using {} filtered GitHub API tools", selection.len());

    Ok(AgentDefinition::builder(settings.instruction.clone(), settings.model.clone())
        .with_name(settings.name.clone())
        .with_description(settings.description.clone())
        .with_tools(selection.into_tools())
        .build())
}
