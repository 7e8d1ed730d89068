//! OpenAPI Specification Loading
//!
//! Reads the GitHub description from disk and turns it into a validated
//! [`OpenApiSpec`]. [`read_api_spec`] reports typed failures;
//! [`load_api_spec`] logs them and returns `None` so callers can treat
//! "no spec" uniformly.

use crate::errors::{AgentError, AgentResult};
use openapiv3::{
    Components, OpenAPI, Operation, Parameter, PathItem, ReferenceOr, RequestBody, Schema,
};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

const FALLBACK_BASE_URL: &str = "http://localhost";

/// Longest `$ref` chain followed before giving up (guards against cycles)
const MAX_REF_DEPTH: usize = 8;

/// Read and parse a JSON document.
///
/// # Errors
/// - [`AgentError::SpecIo`] when the file is missing or unreadable
/// - [`AgentError::SpecParse`] when the content is not valid JSON
pub fn read_api_spec(path: impl AsRef<Path>) -> AgentResult<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| AgentError::SpecIo {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| AgentError::SpecParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read and parse a JSON document, logging any failure.
pub fn load_api_spec(path: impl AsRef<Path>) -> Option<Value> {
    match read_api_spec(path) {
        Ok(spec) => Some(spec),
        Err(e) => {
            tracing::error!("Error loading API spec: {e}");
            None
        }
    }
}

/// Parsed OpenAPI specification with extracted metadata
#[derive(Debug)]
pub struct OpenApiSpec {
    /// The parsed OpenAPI specification
    spec: OpenAPI,
    /// Base URL extracted from servers section
    base_url: String,
}

impl OpenApiSpec {
    /// Build from an already parsed JSON document.
    ///
    /// The base URL comes from the first `servers` entry.
    pub fn from_value(value: Value) -> AgentResult<Self> {
        let spec: OpenAPI =
            serde_json::from_value(value).map_err(|e| AgentError::ToolGeneration {
                reason: format!("Document is not a valid OpenAPI 3.x description: {e}"),
            })?;

        let base_url = spec
            .servers
            .first()
            .map(|s| s.url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| FALLBACK_BASE_URL.to_string());

        Self::validate_spec(&spec)?;

        Ok(Self { spec, base_url })
    }

    /// Parse from a string (JSON first, then YAML) with an explicit base URL
    pub fn from_str(content: &str, base_url: String) -> AgentResult<Self> {
        let spec = serde_json::from_str::<OpenAPI>(content)
            .or_else(|_| serde_yaml::from_str::<OpenAPI>(content))
            .map_err(|e| AgentError::ToolGeneration {
                reason: format!("Failed to parse OpenAPI spec string: {e}"),
            })?;

        Self::validate_spec(&spec)?;

        Ok(Self { spec, base_url })
    }

    /// Fail only on issues that make tool generation impossible
    fn validate_spec(spec: &OpenAPI) -> AgentResult<()> {
        if !spec.openapi.starts_with("3.") {
            return Err(AgentError::ToolGeneration {
                reason: format!(
                    "Unsupported OpenAPI version '{}'. Only 3.x is supported",
                    spec.openapi
                ),
            });
        }

        if spec.paths.paths.is_empty() {
            return Err(AgentError::ToolGeneration {
                reason: "OpenAPI spec has no paths defined".to_string(),
            });
        }

        let mut operation_ids = HashSet::new();
        let mut duplicates = Vec::new();

        for path_item in spec.paths.paths.values() {
            let ReferenceOr::Item(path_item) = path_item else {
                continue;
            };
            for (_, operation) in operations(path_item) {
                if let Some(op_id) = &operation.operation_id {
                    if !operation_ids.insert(op_id.as_str()) {
                        duplicates.push(op_id.clone());
                    }
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(AgentError::ToolGeneration {
                reason: format!("Duplicate operation IDs found: [{}]", duplicates.join(", ")),
            });
        }

        Ok(())
    }

    /// Get the base URL for API calls
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get access to the underlying OpenAPI spec
    #[must_use]
    pub const fn spec(&self) -> &OpenAPI {
        &self.spec
    }

    /// Follow `#/components/parameters/*` references to the parameter itself
    #[must_use]
    pub fn resolve_parameter<'a>(&'a self, item: &'a ReferenceOr<Parameter>) -> Option<&'a Parameter> {
        self.resolve(item, "#/components/parameters/", |c, name| c.parameters.get(name))
    }

    /// Follow `#/components/requestBodies/*` references
    #[must_use]
    pub fn resolve_request_body<'a>(
        &'a self,
        item: &'a ReferenceOr<RequestBody>,
    ) -> Option<&'a RequestBody> {
        self.resolve(item, "#/components/requestBodies/", |c, name| {
            c.request_bodies.get(name)
        })
    }

    /// Follow `#/components/schemas/*` references
    #[must_use]
    pub fn resolve_schema<'a>(&'a self, item: &'a ReferenceOr<Schema>) -> Option<&'a Schema> {
        self.resolve(item, "#/components/schemas/", |c, name| c.schemas.get(name))
    }

    fn resolve<'a, T>(
        &'a self,
        item: &'a ReferenceOr<T>,
        prefix: &str,
        lookup: impl Fn(&'a Components, &str) -> Option<&'a ReferenceOr<T>>,
    ) -> Option<&'a T> {
        let mut current = item;
        for _ in 0..MAX_REF_DEPTH {
            match current {
                ReferenceOr::Item(value) => return Some(value),
                ReferenceOr::Reference { reference } => {
                    let Some(name) = reference.strip_prefix(prefix) else {
                        tracing::debug!(%reference, "unsupported $ref");
                        return None;
                    };
                    current = lookup(self.spec.components.as_ref()?, name)?;
                }
            }
        }
        tracing::debug!(prefix, "$ref chain too deep");
        None
    }
}

/// Operations of a path item as `(METHOD, operation)`, in a fixed method order.
pub(crate) fn operations(path_item: &PathItem) -> Vec<(&'static str, &Operation)> {
    [
        ("GET", path_item.get.as_ref()),
        ("POST", path_item.post.as_ref()),
        ("PUT", path_item.put.as_ref()),
        ("DELETE", path_item.delete.as_ref()),
        ("PATCH", path_item.patch.as_ref()),
        ("HEAD", path_item.head.as_ref()),
        ("OPTIONS", path_item.options.as_ref()),
        ("TRACE", path_item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
    .collect()
}
