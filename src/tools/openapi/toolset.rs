//! OpenAPI Toolset - Dynamic tool generation from OpenAPI specifications
//!
//! Generates one [`OpenApiOperationTool`] per API operation, in document
//! order, all sharing one HTTP client.

use crate::errors::{AgentError, AgentResult};
use crate::tools::openapi::spec::operations;
use crate::tools::openapi::{AuthConfig, OpenApiOperationTool, OpenApiSpec};
use crate::tools::{BaseTool, BaseToolset};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// OpenAPI Toolset that generates tools from OpenAPI specifications
pub struct OpenApiToolSet {
    /// Toolset name (for identification)
    name: String,
    /// Generated tools (one per operation)
    tools: Vec<Arc<OpenApiOperationTool>>,
}

impl OpenApiToolSet {
    /// Create the toolset from a parsed spec.
    ///
    /// # Example
    /// ```no_run
    /// use github_agent::tools::openapi::{AuthConfig, OpenApiSpec, OpenApiToolSet};
    ///
    /// let document = github_agent::tools::openapi::read_api_spec("api.github.com.json").unwrap();
    /// let spec = OpenApiSpec::from_value(document).unwrap();
    /// let auth = AuthConfig::from_token("ghp_example", "token");
    /// let toolset = OpenApiToolSet::from_spec("github", spec, Some(auth)).unwrap();
    /// println!("{} tools", toolset.len());
    /// ```
    pub fn from_spec(
        name: impl Into<String>,
        spec: OpenApiSpec,
        auth: Option<AuthConfig>,
    ) -> AgentResult<Self> {
        let spec = Arc::new(spec);
        let http_client = Arc::new(Self::create_http_client(auth.as_ref())?);

        let mut tools = Vec::new();
        let mut names = HashSet::new();

        for (path, path_item_ref) in &spec.spec().paths.paths {
            let openapiv3::ReferenceOr::Item(path_item) = path_item_ref else {
                tracing::debug!(%path, "skipping $ref path item");
                continue;
            };

            for (method, operation) in operations(path_item) {
                let base_name = operation.operation_id.as_deref().map_or_else(
                    || fallback_tool_name(method, path),
                    to_tool_name,
                );
                let tool_name = unique_name(base_name, &mut names);

                let description = operation
                    .summary
                    .clone()
                    .or_else(|| operation.description.clone())
                    .unwrap_or_else(|| format!("{method} {path}"));

                tools.push(Arc::new(OpenApiOperationTool::new(
                    tool_name,
                    description,
                    method.to_string(),
                    path.clone(),
                    spec.clone(),
                    http_client.clone(),
                    auth.clone(),
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            tools,
        })
    }

    /// Create HTTP client with GitHub defaults and header credentials
    fn create_http_client(auth: Option<&AuthConfig>) -> AgentResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        if let Some((name, value)) = auth.and_then(AuthConfig::header) {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AgentError::ToolGeneration {
                    reason: format!("Invalid header name: {e}"),
                }
            })?;
            let mut value = HeaderValue::from_str(value).map_err(|_| AgentError::ToolGeneration {
                reason: "Credential is not a valid header value".to_string(),
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::ToolGeneration {
                reason: format!("Failed to build HTTP client: {e}"),
            })
    }

    /// Get the toolset name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Turn an operation ID into a model-friendly tool name.
///
/// Lowercase snake case; any run of characters outside `[A-Za-z0-9]` becomes
/// one underscore and camelCase boundaries are split:
/// `repos/list-for-org` → `repos_list_for_org`, `getPetById` → `get_pet_by_id`.
#[must_use]
pub fn to_tool_name(operation_id: &str) -> String {
    let mut name = String::with_capacity(operation_id.len() + 4);
    let mut prev: Option<char> = None;

    for c in operation_id.chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if boundary && !name.ends_with('_') {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
        prev = Some(c);
    }

    while name.ends_with('_') {
        name.pop();
    }
    name
}

/// Name for an operation without an ID: `get /repos/{owner}` → `get_repos_by_owner`
fn fallback_tool_name(method: &str, path: &str) -> String {
    let path_normalized = path
        .trim_start_matches('/')
        .replace('/', "_")
        .replace('{', "by_")
        .replace('}', "");
    to_tool_name(&format!("{}_{path_normalized}", method.to_lowercase()))
}

fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if taken.insert(candidate.clone()) {
            tracing::debug!(tool = %base, renamed = %candidate, "tool name collision");
            return candidate;
        }
        suffix += 1;
    }
}

#[async_trait]
impl BaseToolset for OpenApiToolSet {
    async fn get_tools(&self) -> Vec<Arc<dyn BaseTool>> {
        self.tools
            .iter()
            .map(|t| t.clone() as Arc<dyn BaseTool>)
            .collect()
    }

    async fn close(&self) {
        // Nothing to release; the HTTP client is dropped with the last tool
    }
}

impl std::fmt::Debug for OpenApiToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenApiToolSet")
            .field("name", &self.name)
            .field("tools_count", &self.tools.len())
            .finish()
    }
}
