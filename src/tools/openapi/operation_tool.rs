//! `OpenAPI` Operation Tool - Individual tool for each API operation
//!
//! This module implements `BaseTool` for individual `OpenAPI` operations.

use crate::errors::AgentError;
use crate::tools::openapi::{AuthConfig, OpenApiSpec};
use crate::tools::{BaseTool, FunctionDeclaration, ToolResult};
use openapiv3::{Operation, Parameter, ParameterSchemaOrContent, ReferenceOr, SchemaKind, Type};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;

type ExtractedParams = (Vec<(String, String)>, HashMap<String, String>);

/// Individual tool for a single `OpenAPI` operation
///
/// Each operation in the `OpenAPI` spec gets its own tool with typed parameters.
pub struct OpenApiOperationTool {
    /// Tool name (normalised operation ID)
    name: String,
    /// Operation description
    description: String,
    /// HTTP method for this operation
    method: String,
    /// Path for this operation
    path: String,
    /// Reference to the `OpenAPI` spec
    spec: Arc<OpenApiSpec>,
    /// Shared HTTP client, already carrying header credentials
    http_client: Arc<reqwest::Client>,
    /// Authentication configuration
    auth: Option<AuthConfig>,
}

/// Helper function to convert JSON value to string (for simple scalar values)
fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Encode a query parameter value according to `OpenAPI` style and explode settings
///
/// Returns a vector of (key, value) pairs to support exploded arrays.
fn encode_query_param(
    name: &str,
    value: &serde_json::Value,
    style: &openapiv3::QueryStyle,
    explode: bool,
) -> Vec<(String, String)> {
    use openapiv3::QueryStyle;

    match value {
        serde_json::Value::Array(arr) => {
            let string_values: Vec<String> = arr.iter().map(value_to_string).collect();

            match (style, explode) {
                // ?labels=bug&labels=docs
                (QueryStyle::Form, true) => string_values
                    .into_iter()
                    .map(|v| (name.to_string(), v))
                    .collect(),

                // ?labels=bug,docs
                (QueryStyle::Form, false) | (QueryStyle::DeepObject, _) => {
                    vec![(name.to_string(), string_values.join(","))]
                }

                (QueryStyle::SpaceDelimited, _) => {
                    vec![(name.to_string(), string_values.join(" "))]
                }

                (QueryStyle::PipeDelimited, _) => {
                    vec![(name.to_string(), string_values.join("|"))]
                }
            }
        }

        // ?obj[key1]=value1&obj[key2]=value2
        serde_json::Value::Object(obj) if matches!(style, QueryStyle::DeepObject) => obj
            .iter()
            .map(|(key, val)| (format!("{name}[{key}]"), value_to_string(val)))
            .collect(),

        _ => vec![(name.to_string(), value_to_string(value))],
    }
}

/// Encode a header parameter value; arrays are comma-separated
fn encode_header_param(name: &str, value: &serde_json::Value) -> (String, String) {
    match value {
        serde_json::Value::Array(arr) => {
            let string_values: Vec<String> = arr.iter().map(value_to_string).collect();
            (name.to_string(), string_values.join(","))
        }
        _ => (name.to_string(), value_to_string(value)),
    }
}

/// Percent-encode a string for use in URL path parameters
///
/// Everything except RFC 3986 unreserved characters is encoded, so values
/// like `owner/repo` cannot change the path structure.
fn percent_encode_path_param(s: &str) -> String {
    let mut encoded = String::new();
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => encoded.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    let _ = write!(&mut encoded, "%{byte:02X}");
                }
            }
        }
    }
    encoded
}

/// Convert `OpenAPI` Schema to JSON Schema
fn convert_schema_to_json_schema(schema: &openapiv3::Schema) -> serde_json::Value {
    let mut json_schema = serde_json::json!({});

    match &schema.schema_kind {
        SchemaKind::Type(Type::String(string_type)) => {
            json_schema["type"] = serde_json::json!("string");
            let enum_values: Vec<&str> = string_type
                .enumeration
                .iter()
                .filter_map(|v| v.as_deref())
                .collect();
            if !enum_values.is_empty() {
                json_schema["enum"] = serde_json::json!(enum_values);
            }
        }
        SchemaKind::Type(Type::Number(_)) => {
            json_schema["type"] = serde_json::json!("number");
        }
        SchemaKind::Type(Type::Integer(_)) => {
            json_schema["type"] = serde_json::json!("integer");
        }
        SchemaKind::Type(Type::Boolean(_)) => {
            json_schema["type"] = serde_json::json!("boolean");
        }
        SchemaKind::Type(Type::Array(array_type)) => {
            json_schema["type"] = serde_json::json!("array");
            match &array_type.items {
                Some(ReferenceOr::Item(schema)) => {
                    json_schema["items"] = convert_schema_to_json_schema(schema);
                }
                Some(ReferenceOr::Reference { reference }) => {
                    json_schema["items"] = serde_json::json!({"$ref": reference});
                }
                None => {}
            }
        }
        _ => {
            // Objects, compositions and anything else
            json_schema["type"] = serde_json::json!("object");
        }
    }

    if let Some(description) = &schema.schema_data.description {
        json_schema["description"] = serde_json::json!(description);
    }

    json_schema
}

impl OpenApiOperationTool {
    /// Create a new operation tool
    #[must_use]
    pub fn new(
        name: String,
        description: String,
        method: String,
        path: String,
        spec: Arc<OpenApiSpec>,
        http_client: Arc<reqwest::Client>,
        auth: Option<AuthConfig>,
    ) -> Self {
        Self {
            name,
            description,
            method,
            path,
            spec,
            http_client,
            auth,
        }
    }

    /// HTTP method, upper case
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path template, e.g. `/repos/{owner}/{repo}/issues`
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Find this operation in the `OpenAPI` spec
    /// Returns (`path_item`, operation)
    fn find_operation(&self) -> Option<(&openapiv3::PathItem, &Operation)> {
        let path_item = match self.spec.spec().paths.paths.get(&self.path)? {
            ReferenceOr::Item(item) => item,
            ReferenceOr::Reference { .. } => return None,
        };

        let operation = match self.method.as_str() {
            "GET" => path_item.get.as_ref()?,
            "POST" => path_item.post.as_ref()?,
            "PUT" => path_item.put.as_ref()?,
            "DELETE" => path_item.delete.as_ref()?,
            "PATCH" => path_item.patch.as_ref()?,
            "HEAD" => path_item.head.as_ref()?,
            "OPTIONS" => path_item.options.as_ref()?,
            "TRACE" => path_item.trace.as_ref()?,
            _ => return None,
        };

        Some((path_item, operation))
    }

    /// Merge path-level and operation-level parameters
    ///
    /// `$ref` parameters are resolved against the spec's components first.
    /// Operation-level parameters override path-level ones; a parameter is
    /// identified by its (name, location) pair.
    fn merge_parameters<'a>(
        &'a self,
        path_params: &'a [ReferenceOr<Parameter>],
        operation_params: &'a [ReferenceOr<Parameter>],
    ) -> Vec<&'a Parameter> {
        let resolve = |param_ref: &'a ReferenceOr<Parameter>| {
            let resolved = self.spec.resolve_parameter(param_ref);
            if resolved.is_none() {
                tracing::debug!(tool = %self.name, "skipping unresolvable parameter reference");
            }
            resolved
        };

        let mut merged: Vec<&Parameter> = operation_params.iter().filter_map(resolve).collect();
        let seen: HashSet<_> = merged.iter().map(|p| Self::get_parameter_key(*p)).collect();

        merged.extend(
            path_params
                .iter()
                .filter_map(resolve)
                .filter(|p| !seen.contains(&Self::get_parameter_key(p))),
        );

        merged
    }

    fn get_parameter_key(param: &Parameter) -> (&str, &'static str) {
        match param {
            Parameter::Query { parameter_data, .. } => (parameter_data.name.as_str(), "query"),
            Parameter::Header { parameter_data, .. } => (parameter_data.name.as_str(), "header"),
            Parameter::Path { parameter_data, .. } => (parameter_data.name.as_str(), "path"),
            Parameter::Cookie { parameter_data, .. } => (parameter_data.name.as_str(), "cookie"),
        }
    }

    /// Build the full URL with path parameters
    fn build_url(&self, args: &HashMap<String, serde_json::Value>) -> String {
        let mut url = format!("{}{}", self.spec.base_url(), self.path);

        for (key, value) in args {
            let placeholder = format!("{{{key}}}");
            if url.contains(&placeholder) {
                let encoded_value = percent_encode_path_param(&value_to_string(value));
                url = url.replace(&placeholder, &encoded_value);
            }
        }

        url
    }

    /// Extract query and header parameters from the merged definitions.
    ///
    /// Query params use Vec to support exploded arrays with duplicate keys.
    /// Path parameters are handled by `build_url`; cookies are not used by
    /// the GitHub API and are ignored.
    fn extract_parameters(
        &self,
        path_item: &openapiv3::PathItem,
        operation: &Operation,
        args: &HashMap<String, serde_json::Value>,
    ) -> ExtractedParams {
        let mut query_params = Vec::new();
        let mut header_params = HashMap::new();

        for param in self.merge_parameters(&path_item.parameters, &operation.parameters) {
            match param {
                Parameter::Query {
                    parameter_data,
                    style,
                    ..
                } => {
                    if let Some(value) = args.get(&parameter_data.name) {
                        let explode = parameter_data.explode.unwrap_or(true);
                        query_params.extend(encode_query_param(
                            &parameter_data.name,
                            value,
                            style,
                            explode,
                        ));
                    }
                }
                Parameter::Header { parameter_data, .. } => {
                    if let Some(value) = args.get(&parameter_data.name) {
                        let (name, encoded_value) =
                            encode_header_param(&parameter_data.name, value);
                        header_params.insert(name, encoded_value);
                    }
                }
                Parameter::Path { .. } | Parameter::Cookie { .. } => {}
            }
        }

        (query_params, header_params)
    }
}

#[async_trait::async_trait]
impl BaseTool for OpenApiOperationTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn declaration(&self) -> FunctionDeclaration {
        let Some((path_item, operation)) = self.find_operation() else {
            return FunctionDeclaration::new(
                self.name.clone(),
                self.description.clone(),
                serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            );
        };

        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in self.merge_parameters(&path_item.parameters, &operation.parameters) {
            let (Parameter::Query {
                parameter_data: param_data,
                ..
            }
            | Parameter::Header {
                parameter_data: param_data,
                ..
            }
            | Parameter::Path {
                parameter_data: param_data,
                ..
            }
            | Parameter::Cookie {
                parameter_data: param_data,
                ..
            }) = param;

            let mut param_schema = match &param_data.format {
                ParameterSchemaOrContent::Schema(schema_ref) => {
                    match self.spec.resolve_schema(schema_ref) {
                        Some(schema) => convert_schema_to_json_schema(schema),
                        None => serde_json::json!({"type": "string"}),
                    }
                }
                ParameterSchemaOrContent::Content(_) => serde_json::json!({"type": "object"}),
            };
            if param_schema.get("description").is_none() {
                if let Some(desc) = &param_data.description {
                    param_schema["description"] = serde_json::json!(desc);
                }
            }

            properties.insert(param_data.name.clone(), param_schema);

            if param_data.required {
                required.push(param_data.name.clone());
            }
        }

        if let Some(request_body) = &operation.request_body {
            let body_required = self
                .spec
                .resolve_request_body(request_body)
                .is_some_and(|rb| rb.required);

            properties.insert(
                "body".to_string(),
                serde_json::json!({
                    "type": "object",
                    "description": "Request body"
                }),
            );

            if body_required {
                required.push("body".to_string());
            }
        }

        FunctionDeclaration::new(
            self.name.clone(),
            self.description.clone(),
            serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required
            }),
        )
    }

    async fn run_async(&self, args: HashMap<String, serde_json::Value>) -> ToolResult {
        let Some((path_item, operation)) = self.find_operation() else {
            return ToolResult::error(format!(
                "Operation '{}' not found in OpenAPI spec",
                self.name
            ));
        };

        let (query_params, header_params) = self.extract_parameters(path_item, operation, &args);
        let url = self.build_url(&args);

        let mut request_builder = match self.method.as_str() {
            "GET" => self.http_client.get(&url),
            "POST" => self.http_client.post(&url),
            "PUT" => self.http_client.put(&url),
            "DELETE" => self.http_client.delete(&url),
            "PATCH" => self.http_client.patch(&url),
            "HEAD" => self.http_client.head(&url),
            method => {
                return ToolResult::error(format!("Unsupported HTTP method: {method}"));
            }
        };

        if !query_params.is_empty() {
            request_builder = request_builder.query(&query_params);
        }

        for (name, value) in header_params {
            request_builder = request_builder.header(name, value);
        }

        // Header credentials are default headers on the client
        if let Some((name, value)) = self.auth.as_ref().and_then(AuthConfig::query) {
            request_builder = request_builder.query(&[(name, value)]);
        }

        if matches!(self.method.as_str(), "POST" | "PUT" | "PATCH") {
            if let Some(body) = args.get("body") {
                request_builder = request_builder.json(body);
            }
        }

        tracing::debug!(tool = %self.name, method = %self.method, %url, "invoking GitHub API");

        let response = match request_builder.send().await {
            Ok(resp) => resp,
            Err(e) => return AgentError::from(e).into(),
        };

        let status = response.status();
        let status_code = status.as_u16();

        let body_text = match response.text().await {
            Ok(text) => text,
            Err(e) => return AgentError::from(e).into(),
        };

        // JSON when possible, plain text otherwise (e.g. 204 No Content)
        let body = serde_json::from_str::<serde_json::Value>(&body_text)
            .unwrap_or_else(|_| serde_json::Value::String(body_text.clone()));

        if status.is_success() {
            ToolResult::success(serde_json::json!({
                "status": status_code,
                "body": body,
            }))
        } else {
            ToolResult::error(format!(
                "HTTP {} {}: {}",
                status_code,
                status.canonical_reason().unwrap_or("Unknown"),
                body_text
            ))
        }
    }
}
