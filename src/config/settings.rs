//! Agent settings
//!
//! Settings are layered: built-in defaults, an optional YAML/JSON settings
//! file, `GITHUB_AGENT_*` environment overrides, then command line flags.

use crate::config::EnvKey;
use crate::errors::{AgentError, AgentResult};
use crate::tools::selection::{DEFAULT_GITHUB_KEYWORDS, DEFAULT_TOOL_LIMIT, SelectionPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SPEC_PATH: &str = "api.github.com.fixed.json";
pub const DEFAULT_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const DEFAULT_AUTH_PREFIX: &str = "token";
pub const DEFAULT_AGENT_NAME: &str = "github_agent";
pub const DEFAULT_AGENT_DESCRIPTION: &str = "GitHub API Agent";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BOOTSTRAP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_INSTRUCTION: &str = "\
You are a GitHub API agent that interacts with GitHub's REST API.

When working with the GitHub API:
- Use parameters provided by the user
- Ask for clarification if required parameters are missing
- Format responses clearly for the user
- Handle errors gracefully and explain issues in simple terms

For content creation operations:
- Use names and identifiers exactly as specified by the user
- Add helpful descriptions when allowed by the API
- Apply sensible defaults for optional parameters when not specified

Always inform the user about the actions you're taking and the results received.";

/// Environment variable overriding [`AgentSettings::spec_path`]
pub const SPEC_PATH_ENV: &str = "GITHUB_AGENT_SPEC_PATH";
/// Environment variable overriding [`AgentSettings::model`]
pub const MODEL_ENV: &str = "GITHUB_AGENT_MODEL";
/// Environment variable overriding [`AgentSettings::max_tools`]
pub const MAX_TOOLS_ENV: &str = "GITHUB_AGENT_MAX_TOOLS";

/// Everything needed to build the GitHub agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Path to the GitHub OpenAPI description (JSON)
    pub spec_path: PathBuf,
    /// Name of the environment variable holding the GitHub token
    pub token_env_var: String,
    /// Prefix placed before the token in the `Authorization` header
    pub auth_prefix: String,
    pub name: String,
    pub description: String,
    pub instruction: String,
    /// Model identifier handed to the hosting runtime
    pub model: String,
    /// Hard cap on the number of tools given to the agent
    pub max_tools: usize,
    /// Lowercase substrings that mark a tool as worth keeping
    pub keywords: Vec<String>,
    pub bootstrap_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_PATH),
            token_env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
            auth_prefix: DEFAULT_AUTH_PREFIX.to_string(),
            name: DEFAULT_AGENT_NAME.to_string(),
            description: DEFAULT_AGENT_DESCRIPTION.to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tools: DEFAULT_TOOL_LIMIT,
            keywords: DEFAULT_GITHUB_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            bootstrap_timeout_secs: DEFAULT_BOOTSTRAP_TIMEOUT_SECS,
        }
    }
}

impl AgentSettings {
    /// Load settings from a file, using the extension to pick the format.
    ///
    /// - `.json` → JSON
    /// - `.yaml` / `.yml` → YAML
    /// - anything else → error
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> AgentResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AgentError::InvalidConfiguration {
                field: "config".to_string(),
                reason: format!("Failed to read settings file '{}': {e}", path.display()),
            })?;

        let settings: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some(ext) => {
                return Err(AgentError::InvalidConfiguration {
                    field: "config".to_string(),
                    reason: format!(
                        "Unsupported file extension '.{ext}' for '{}'; use .json, .yaml or .yml",
                        path.display()
                    ),
                });
            }
            None => {
                return Err(AgentError::InvalidConfiguration {
                    field: "config".to_string(),
                    reason: format!(
                        "No file extension for '{}'; use .json, .yaml or .yml",
                        path.display()
                    ),
                });
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Apply `GITHUB_AGENT_*` overrides from the process environment
    pub fn apply_env_overrides(self) -> AgentResult<Self> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using an arbitrary lookup function.
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(SPEC_PATH_ENV).filter(|v| !v.is_empty()) {
            self.spec_path = PathBuf::from(path);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.is_empty()) {
            self.model = model;
        }
        if let Some(raw) = lookup(MAX_TOOLS_ENV).filter(|v| !v.is_empty()) {
            self.max_tools =
                raw.trim()
                    .parse()
                    .map_err(|e| AgentError::InvalidConfiguration {
                        field: MAX_TOOLS_ENV.to_string(),
                        reason: format!("'{raw}' is not a valid tool count: {e}"),
                    })?;
        }
        Ok(self)
    }

    /// Reject settings that can never produce a usable agent
    pub fn validate(&self) -> AgentResult<()> {
        let invalid = |field: &str, reason: &str| {
            Err(AgentError::InvalidConfiguration {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.name.trim().is_empty() {
            return invalid("name", "Agent name cannot be empty");
        }
        if self.instruction.trim().is_empty() {
            return invalid("instruction", "Instruction cannot be empty");
        }
        if self.model.trim().is_empty() {
            return invalid("model", "Model identifier cannot be empty");
        }
        if self.token_env_var.trim().is_empty() {
            return invalid("token_env_var", "Token variable name cannot be empty");
        }
        if self.max_tools == 0 {
            return invalid("max_tools", "max_tools must be greater than 0");
        }
        if self.bootstrap_timeout_secs == 0 {
            return invalid(
                "bootstrap_timeout_secs",
                "bootstrap_timeout_secs must be greater than 0",
            );
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return invalid("keywords", "At least one keyword is required");
        }
        Ok(())
    }

    #[must_use]
    pub fn token_key(&self) -> EnvKey {
        EnvKey::new(self.token_env_var.clone())
    }

    #[must_use]
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(self.keywords.iter().map(String::as_str), self.max_tools)
    }

    #[must_use]
    pub const fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_github_agent() {
        let settings = AgentSettings::default();
        assert_eq!(settings.name, "github_agent");
        assert_eq!(settings.description, "GitHub API Agent");
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.token_env_var, "GITHUB_TOKEN");
        assert_eq!(settings.auth_prefix, "token");
        assert_eq!(settings.max_tools, 500);
        assert_eq!(settings.bootstrap_timeout(), Duration::from_secs(30));
        assert!(settings.keywords.iter().any(|k| k == "workflow"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn yaml_file_overrides_only_given_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "model: gemini-2.5-pro\nmax_tools: 120\nkeywords: [issue, pull]").unwrap();

        let settings = AgentSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(settings.max_tools, 120);
        assert_eq!(settings.keywords, vec!["issue", "pull"]);
        assert_eq!(settings.name, DEFAULT_AGENT_NAME);
    }

    #[test]
    fn json_file_is_parsed() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"token_env_var": "GH_PAT", "auth_prefix": "Bearer"}}"#).unwrap();

        let settings = AgentSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.token_env_var, "GH_PAT");
        assert_eq!(settings.auth_prefix, "Bearer");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = AgentSettings::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn zero_cap_in_file_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"max_tools": 0}}"#).unwrap();
        let err = AgentSettings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfiguration { field, .. } if field == "max_tools"));
    }

    #[test]
    fn env_overrides_are_applied() {
        let env: HashMap<&str, &str> = HashMap::from([
            (SPEC_PATH_ENV, "/srv/specs/github.json"),
            (MODEL_ENV, "gemini-2.5-flash"),
            (MAX_TOOLS_ENV, " 250 "),
        ]);

        let settings = AgentSettings::default()
            .apply_overrides_from(|k| env.get(k).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(settings.spec_path, PathBuf::from("/srv/specs/github.json"));
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.max_tools, 250);
    }

    #[test]
    fn invalid_max_tools_override_is_an_error() {
        let err = AgentSettings::default()
            .apply_overrides_from(|k| (k == MAX_TOOLS_ENV).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn empty_keywords_fail_validation() {
        let settings = AgentSettings {
            keywords: vec![String::new()],
            ..AgentSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
