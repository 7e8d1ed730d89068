//! Common test utilities and setup

#![allow(dead_code)]

use github_agent::config::{EnvKey, EnvResolverFn};
use github_agent::{AgentError, AgentSettings};
use std::path::PathBuf;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Load `.env` if present. Live tests skip when their token is absent.
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// `EnvKey` for `key_name` when the variable is set
pub fn get_api_key(key_name: &str) -> Option<EnvKey> {
    init_test_env();
    std::env::var(key_name).ok().map(|_| EnvKey::new(key_name))
}

pub fn get_github_token() -> Option<EnvKey> {
    get_api_key("GITHUB_TOKEN")
}

/// The trimmed GitHub description shipped with the tests
pub fn fixture_spec() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("github_mini.json")
}

/// Default settings pointed at the fixture spec and a test-only token variable
pub fn fixture_settings(token_env_var: &str) -> AgentSettings {
    AgentSettings {
        spec_path: fixture_spec(),
        token_env_var: token_env_var.to_string(),
        ..AgentSettings::default()
    }
}

/// Resolver that hands out `token` for every key, without touching the environment
pub fn static_resolver(token: &'static str) -> EnvResolverFn {
    Arc::new(move |_key: &str| Ok::<_, AgentError>(token.to_string()))
}

/// Tools in the fixture whose names match the default GitHub keywords
pub const FIXTURE_MATCHING_TOOLS: &[&str] = &[
    "users_get_authenticated",
    "repos_get",
    "issues_list_for_repo",
    "issues_create",
    "pulls_list",
    "repos_list_commits",
];
