//! Credentials for generated OpenAPI tools
//!
//! GitHub accepts a personal access token as `Authorization: token <PAT>`
//! (or `Bearer <PAT>`). The header is modelled as an API key carried in a
//! header, split into the public [`AuthScheme`] and the secret
//! [`AuthCredential`].

use std::fmt;

/// Header name GitHub reads tokens from
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Location for API key authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOrQuery {
    Header,
    Query,
}

/// How a credential is attached to outgoing requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    ApiKey {
        location: HeaderOrQuery,
        name: String,
    },
}

impl AuthScheme {
    /// Parameter (header or query) name the credential is sent under
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        match self {
            Self::ApiKey { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn location(&self) -> HeaderOrQuery {
        match self {
            Self::ApiKey { location, .. } => *location,
        }
    }
}

/// Secret value sent with every request. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthCredential {
    value: String,
}

impl AuthCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw secret, for placing on the wire only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthCredential(<redacted>)")
    }
}

/// Runtime authentication configuration: scheme plus secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    scheme: AuthScheme,
    credential: AuthCredential,
}

impl AuthConfig {
    #[must_use]
    pub const fn new(scheme: AuthScheme, credential: AuthCredential) -> Self {
        Self { scheme, credential }
    }

    /// `Authorization: <prefix> <token>` header auth
    pub fn from_token(token: &str, prefix: &str) -> Self {
        let (scheme, credential) = token_to_scheme_credential(token, prefix);
        Self::new(scheme, credential)
    }

    #[must_use]
    pub const fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }

    #[must_use]
    pub const fn credential(&self) -> &AuthCredential {
        &self.credential
    }

    /// `(name, value)` when the credential travels in a header
    #[must_use]
    pub fn header(&self) -> Option<(&str, &str)> {
        match self.scheme.location() {
            HeaderOrQuery::Header => Some((self.scheme.parameter_name(), self.credential.expose())),
            HeaderOrQuery::Query => None,
        }
    }

    /// `(name, value)` when the credential travels in the query string
    #[must_use]
    pub fn query(&self) -> Option<(&str, &str)> {
        match self.scheme.location() {
            HeaderOrQuery::Query => Some((self.scheme.parameter_name(), self.credential.expose())),
            HeaderOrQuery::Header => None,
        }
    }
}

/// Build the API-key-in-header scheme and the `"<prefix> <token>"` credential.
///
/// Pure construction. Callers are expected to have rejected an empty token
/// already (see [`EnvKey::resolve`](crate::config::EnvKey::resolve)). An
/// empty prefix sends the bare token.
pub fn token_to_scheme_credential(token: &str, prefix: &str) -> (AuthScheme, AuthCredential) {
    let prefix = prefix.trim();
    let value = if prefix.is_empty() {
        token.to_string()
    } else {
        format!("{prefix} {token}")
    };

    (
        AuthScheme::ApiKey {
            location: HeaderOrQuery::Header,
            name: AUTHORIZATION_HEADER.to_string(),
        },
        AuthCredential::new(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_authorization_header() {
        let (scheme, credential) = token_to_scheme_credential("ghp_abc123", "token");

        assert_eq!(
            scheme,
            AuthScheme::ApiKey {
                location: HeaderOrQuery::Header,
                name: "Authorization".to_string(),
            }
        );
        assert_eq!(credential.expose(), "token ghp_abc123");
    }

    #[test]
    fn empty_prefix_sends_bare_token() {
        let (_, credential) = token_to_scheme_credential("ghp_abc123", "");
        assert_eq!(credential.expose(), "ghp_abc123");
    }

    #[test]
    fn debug_output_hides_secret() {
        let auth = AuthConfig::from_token("ghp_supersecret", "Bearer");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("ghp_supersecret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn header_and_query_are_exclusive() {
        let auth = AuthConfig::from_token("t", "token");
        assert_eq!(auth.header(), Some(("Authorization", "token t")));
        assert_eq!(auth.query(), None);

        let query_auth = AuthConfig::new(
            AuthScheme::ApiKey {
                location: HeaderOrQuery::Query,
                name: "access_token".to_string(),
            },
            AuthCredential::new("t"),
        );
        assert_eq!(query_auth.header(), None);
        assert_eq!(query_auth.query(), Some(("access_token", "t")));
    }
}
