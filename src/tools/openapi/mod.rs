//! OpenAPI tool integration
//!
//! Turns an OpenAPI 3.x description into one callable tool per operation.
//! Tools share a single HTTP client that carries the GitHub credential.
//!
//! # Example
//! ```no_run
//! use github_agent::tools::BaseToolset;
//! use github_agent::tools::openapi::{AuthConfig, OpenApiSpec, OpenApiToolSet, read_api_spec};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let document = read_api_spec("api.github.com.fixed.json").unwrap();
//! let spec = OpenApiSpec::from_value(document).unwrap();
//! let auth = AuthConfig::from_token("ghp_example", "token");
//!
//! let toolset = OpenApiToolSet::from_spec("github", spec, Some(auth)).unwrap();
//! let tools = toolset.get_tools().await;
//! # });
//! ```

pub mod auth;
pub mod operation_tool;
pub mod spec;
pub mod toolset;

pub use auth::{
    AUTHORIZATION_HEADER, AuthConfig, AuthCredential, AuthScheme, HeaderOrQuery,
    token_to_scheme_credential,
};
pub use operation_tool::OpenApiOperationTool;
pub use spec::{OpenApiSpec, load_api_spec, read_api_spec};
pub use toolset::{OpenApiToolSet, to_tool_name};
