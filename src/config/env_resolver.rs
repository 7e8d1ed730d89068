//! Environment variable resolution for secrets
//!
//! The GitHub token is referenced through an [`EnvKey`] so the pipeline never
//! holds the secret before it needs it. A custom [`EnvResolverFn`] can be
//! plugged in for secret managers; the default reads `std::env`.

use crate::errors::AgentError;
use std::fmt;
use std::sync::Arc;

/// A reference to an environment variable holding a secret
///
/// # Example
///
/// ```no_run
/// use github_agent::config::EnvKey;
///
/// let token = EnvKey::new("GITHUB_TOKEN").resolve().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvKey(String);

impl EnvKey {
    /// Create a new environment key reference
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key name
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }

    /// Resolve this key from the process environment.
    ///
    /// An unset variable and an empty one are both reported as
    /// [`AgentError::MissingToken`]. Whitespace is passed through as is.
    pub fn resolve(&self) -> Result<String, AgentError> {
        default_env_resolver(&self.0)
    }

    /// Resolve this key using a custom resolver, or fall back to the environment.
    ///
    /// An empty value from a custom resolver is a [`AgentError::MissingToken`]
    /// too.
    pub fn resolve_with(&self, resolver: Option<&EnvResolverFn>) -> Result<String, AgentError> {
        match resolver {
            Some(resolver) => resolver(self.key()).and_then(|value| non_empty(self.key(), value)),
            None => self.resolve(),
        }
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EnvKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EnvKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Resolver function for secrets.
///
/// Takes the key name and returns the secret value.
pub type EnvResolverFn = Arc<dyn Fn(&str) -> Result<String, AgentError> + Send + Sync>;

/// Default resolver backed by `std::env::var`
pub fn default_env_resolver(key: &str) -> Result<String, AgentError> {
    match std::env::var(key) {
        Ok(value) => non_empty(key, value),
        Err(_) => Err(AgentError::MissingToken {
            env_var: key.to_string(),
        }),
    }
}

fn non_empty(key: &str, value: String) -> Result<String, AgentError> {
    if value.is_empty() {
        Err(AgentError::MissingToken {
            env_var: key.to_string(),
        })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_creation() {
        let key = EnvKey::new("GITHUB_TOKEN");
        assert_eq!(key.key(), "GITHUB_TOKEN");
        assert_eq!(key.to_string(), "GITHUB_TOKEN");
    }

    #[test]
    fn test_env_key_from_str() {
        let key: EnvKey = "GH_PAT".into();
        assert_eq!(key.key(), "GH_PAT");
    }

    #[test]
    fn test_env_key_resolve() {
        unsafe {
            std::env::set_var("GITHUB_AGENT_TEST_TOKEN_1", "ghp_resolved");
        }
        let key = EnvKey::new("GITHUB_AGENT_TEST_TOKEN_1");
        assert_eq!(key.resolve().unwrap(), "ghp_resolved");
    }

    #[test]
    fn test_env_key_resolve_missing() {
        let key = EnvKey::new("GITHUB_AGENT_MISSING_TOKEN_XYZ");
        let err = key.resolve().unwrap_err();
        assert!(matches!(err, AgentError::MissingToken { env_var } if env_var == "GITHUB_AGENT_MISSING_TOKEN_XYZ"));
    }

    #[test]
    fn test_env_key_resolve_empty_is_missing() {
        unsafe {
            std::env::set_var("GITHUB_AGENT_TEST_TOKEN_EMPTY", "");
        }
        let key = EnvKey::new("GITHUB_AGENT_TEST_TOKEN_EMPTY");
        assert!(matches!(
            key.resolve(),
            Err(AgentError::MissingToken { .. })
        ));
    }

    #[test]
    fn test_custom_resolver_function() {
        let vault: EnvResolverFn = Arc::new(|key: &str| {
            if key == "VAULT_GITHUB_TOKEN" {
                Ok("secret_from_vault".to_string())
            } else {
                Err(AgentError::MissingToken {
                    env_var: key.to_string(),
                })
            }
        });

        let key = EnvKey::new("VAULT_GITHUB_TOKEN");
        assert_eq!(key.resolve_with(Some(&vault)).unwrap(), "secret_from_vault");
        assert!(EnvKey::new("OTHER").resolve_with(Some(&vault)).is_err());
    }

    #[test]
    fn test_custom_resolver_empty_value_is_missing() {
        let blank: EnvResolverFn = Arc::new(|_key: &str| Ok::<_, AgentError>(String::new()));

        let err = EnvKey::new("VAULT_GITHUB_TOKEN")
            .resolve_with(Some(&blank))
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingToken { env_var } if env_var == "VAULT_GITHUB_TOKEN"));
    }

    #[test]
    fn test_whitespace_token_is_passed_through() {
        unsafe {
            std::env::set_var("GITHUB_AGENT_TEST_TOKEN_SPACES", " ghp_padded ");
        }
        let key = EnvKey::new("GITHUB_AGENT_TEST_TOKEN_SPACES");
        assert_eq!(key.resolve().unwrap(), " ghp_padded ");
    }
}
