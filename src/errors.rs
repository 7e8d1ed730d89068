/// Main error type for the GitHub agent pipeline
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // === Spec Loading Errors ===
    #[error("Failed to read API spec '{path}': {reason}")]
    SpecIo { path: String, reason: String },

    #[error("Failed to parse API spec '{path}': {reason}")]
    SpecParse { path: String, reason: String },

    // === Credential Errors ===
    #[error("GitHub token missing from environment variable: {env_var}")]
    MissingToken { env_var: String },

    // === Tool Errors ===
    #[error("Tool generation failed: {reason}")]
    ToolGeneration { reason: String },

    #[error("No tools available: {reason}")]
    NoTools { reason: String },

    // === Bootstrap Errors ===
    #[error("Bootstrap timed out after {timeout_ms}ms")]
    BootstrapTimeout { timeout_ms: u64 },

    // === Configuration Errors ===
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    // === Network/IO Errors ===
    #[error("Network error: {operation}: {reason}")]
    Network { operation: String, reason: String },

    #[error("Serialization error: {format}: {reason}")]
    Serialization { format: String, reason: String },

    // === General System Errors ===
    #[error("Internal error: {component}: {reason}")]
    Internal { component: String, reason: String },
}

/// Convenience type alias
pub type AgentResult<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Short label of the pipeline stage that produced this error.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::SpecIo { .. } | Self::SpecParse { .. } => "spec_loader",
            Self::MissingToken { .. } => "credentials",
            Self::ToolGeneration { .. } | Self::Network { .. } => "toolset",
            Self::NoTools { .. } => "tool_selector",
            Self::BootstrapTimeout { .. } => "bootstrap",
            Self::InvalidConfiguration { .. } | Self::Serialization { .. } => "config",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Convert `AgentError` to `ToolResult` for tool execution contexts
impl From<AgentError> for crate::tools::ToolResult {
    fn from(error: AgentError) -> Self {
        Self::error(error.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            format: "json".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AgentError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Serialization {
            format: "yaml".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<std::io::Error> for AgentError {
    fn from(error: std::io::Error) -> Self {
        Self::Internal {
            component: "io".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for AgentError {
    fn from(error: tokio::task::JoinError) -> Self {
        let reason = if error.is_cancelled() {
            "task cancelled".to_string()
        } else if error.is_panic() {
            "task panicked".to_string()
        } else {
            error.to_string()
        };

        Self::Internal {
            component: "task".to_string(),
            reason,
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network {
            operation: "http_request".to_string(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_to_string_contains_context() {
        let err = AgentError::InvalidConfiguration {
            field: "max_tools".into(),
            reason: "must be greater than 0".into(),
        };
        let message = err.to_string();
        assert!(message.contains("max_tools"));
        assert!(message.contains("greater than 0"));
    }

    #[test]
    fn missing_token_names_variable() {
        let err = AgentError::MissingToken {
            env_var: "GITHUB_TOKEN".into(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub token missing from environment variable: GITHUB_TOKEN"
        );
        assert_eq!(err.stage(), "credentials");
    }

    #[test]
    fn json_error_maps_to_serialization() {
        let err: AgentError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, AgentError::Serialization { ref format, .. } if format == "json"));
    }
}
