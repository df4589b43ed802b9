//! Credential resolution for the digest backends.
//!
//! Every secret a backend needs is resolved on its own, from three sources in
//! priority order:
//!
//! 1. an explicit value passed by the caller,
//! 2. the process-wide [`CredentialCache`],
//! 3. the environment.
//!
//! A value read from the environment is written back to the cache, so later
//! resolutions in the same process see it even if the environment changes.

use crate::error::{DigestError, Result};
use std::fmt;

pub mod store;

pub use store::{CredentialCache, EnvSource, ProcessEnv, StaticEnv};

#[cfg(test)]
mod store_tests;

/// Environment variable holding the Artifactory user.
pub const ARTIFACTORY_USER: &str = "ARTIFACTORY_USER";
/// Environment variable holding the Artifactory API key.
pub const ARTIFACTORY_KEY: &str = "ARTIFACTORY_KEY";
/// Environment variable holding the Artifactory base URL.
pub const ARTIFACTORY_BASE: &str = "ARTIFACTORY_BASE";
/// Environment variable holding the Docker Hub user.
pub const DOCKER_USER: &str = "DOCKER_USER";
/// Environment variable holding the Docker Hub access key.
pub const DOCKER_KEY: &str = "DOCKER_KEY";
/// Environment variable holding an optional Quay API token.
pub const QUAY_TOKEN: &str = "QUAY_TOKEN";

/// Credentials for registry authentication.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication required (anonymous access)
    Anonymous,

    /// HTTP Basic authentication with username and password
    Basic {
        /// Username for authentication
        username: String,
        /// Password for authentication
        password: String,
    },

    /// Bearer token authentication (OAuth2-style)
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates Bearer token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::auth::Credentials;
    ///
    /// let creds = Credentials::basic("user", "pass");
    /// assert_eq!(creds.to_header_value().unwrap(), "Basic dXNlcjpwYXNz");
    /// assert!(Credentials::anonymous().to_header_value().is_none());
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } if token.is_empty() => None,
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Resolves a required credential.
///
/// Returns the first non-empty value among `explicit`, the cache entry for
/// `env_key` and the environment variable `env_key`. A value taken from the
/// environment is stored in the cache.
///
/// # Errors
///
/// Returns [`DigestError::MissingCredentials`] naming `name` and `env_key`
/// when no source has a value.
///
/// # Examples
///
/// ```
/// use libregdigest::auth::{resolve_credential, CredentialCache, StaticEnv};
///
/// let cache = CredentialCache::new();
/// let env = StaticEnv::new().with("ARTIFACTORY_USER", "deployer");
///
/// let user = resolve_credential("artifactory user", None, &cache, "ARTIFACTORY_USER", &env).unwrap();
/// assert_eq!(user, "deployer");
/// assert_eq!(cache.get("ARTIFACTORY_USER").as_deref(), Some("deployer"));
/// ```
pub fn resolve_credential(
    name: &str,
    explicit: Option<&str>,
    cache: &CredentialCache,
    env_key: &str,
    env: &dyn EnvSource,
) -> Result<String> {
    resolve_optional_credential(explicit, cache, env_key, env).ok_or_else(|| {
        DigestError::missing_credentials(format!(
            "No {} provided or found in {} environment variable",
            name, env_key
        ))
    })
}

/// Resolves a credential that a backend can do without.
///
/// Same precedence as [`resolve_credential`], but an absent value is `None`
/// instead of an error.
pub fn resolve_optional_credential(
    explicit: Option<&str>,
    cache: &CredentialCache,
    env_key: &str,
    env: &dyn EnvSource,
) -> Option<String> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }
    if let Some(value) = cache.get(env_key).filter(|v| !v.is_empty()) {
        return Some(value);
    }
    let value = env.get(env_key).filter(|v| !v.is_empty())?;
    cache.set(env_key, &value);
    Some(value)
}

/// Caller-supplied credentials, taking priority over cache and environment.
///
/// # Examples
///
/// ```
/// use libregdigest::auth::CredentialOverrides;
///
/// let overrides = CredentialOverrides::new()
///     .artifactory_user("deployer")
///     .artifactory_key("s3cr3t");
/// assert!(!format!("{:?}", overrides).contains("s3cr3t"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialOverrides {
    pub artifactory_user: Option<String>,
    pub artifactory_key: Option<String>,
    pub artifactory_base: Option<String>,
    pub docker_user: Option<String>,
    pub docker_key: Option<String>,
    pub quay_token: Option<String>,
}

impl CredentialOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Artifactory user.
    pub fn artifactory_user(mut self, user: impl Into<String>) -> Self {
        self.artifactory_user = Some(user.into());
        self
    }

    /// Sets the Artifactory API key.
    pub fn artifactory_key(mut self, key: impl Into<String>) -> Self {
        self.artifactory_key = Some(key.into());
        self
    }

    /// Sets the Artifactory base URL.
    pub fn artifactory_base(mut self, base: impl Into<String>) -> Self {
        self.artifactory_base = Some(base.into());
        self
    }

    /// Sets the Docker Hub user.
    pub fn docker_user(mut self, user: impl Into<String>) -> Self {
        self.docker_user = Some(user.into());
        self
    }

    /// Sets the Docker Hub access key.
    pub fn docker_key(mut self, key: impl Into<String>) -> Self {
        self.docker_key = Some(key.into());
        self
    }

    /// Sets the Quay API token.
    pub fn quay_token(mut self, token: impl Into<String>) -> Self {
        self.quay_token = Some(token.into());
        self
    }
}

impl fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |v: &Option<String>| v.as_ref().map(|_| "<set>");
        f.debug_struct("CredentialOverrides")
            .field("artifactory_user", &self.artifactory_user)
            .field("artifactory_key", &set(&self.artifactory_key))
            .field("artifactory_base", &self.artifactory_base)
            .field("docker_user", &self.docker_user)
            .field("docker_key", &set(&self.docker_key))
            .field("quay_token", &set(&self.quay_token))
            .finish()
    }
}

/// Resolved Artifactory settings. All three are required.
#[derive(Clone, PartialEq, Eq)]
pub struct ArtifactoryAuth {
    pub user: String,
    pub key: String,
    pub base: String,
}

impl ArtifactoryAuth {
    /// Resolves user, key and base URL, failing on the first one missing.
    pub fn resolve(
        overrides: &CredentialOverrides,
        cache: &CredentialCache,
        env: &dyn EnvSource,
    ) -> Result<Self> {
        Ok(Self {
            user: resolve_credential(
                "artifactory user",
                overrides.artifactory_user.as_deref(),
                cache,
                ARTIFACTORY_USER,
                env,
            )?,
            key: resolve_credential(
                "artifactory key",
                overrides.artifactory_key.as_deref(),
                cache,
                ARTIFACTORY_KEY,
                env,
            )?,
            base: resolve_credential(
                "artifactory base",
                overrides.artifactory_base.as_deref(),
                cache,
                ARTIFACTORY_BASE,
                env,
            )?,
        })
    }

    /// Basic credentials for the storage API.
    pub fn credentials(&self) -> Credentials {
        Credentials::basic(&self.user, &self.key)
    }
}

impl fmt::Debug for ArtifactoryAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactoryAuth")
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .field("base", &self.base)
            .finish()
    }
}

/// Resolved Docker Hub credentials. Both are optional.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DockerAuth {
    pub user: Option<String>,
    pub key: Option<String>,
}

impl DockerAuth {
    pub fn resolve(
        overrides: &CredentialOverrides,
        cache: &CredentialCache,
        env: &dyn EnvSource,
    ) -> Self {
        Self {
            user: resolve_optional_credential(
                overrides.docker_user.as_deref(),
                cache,
                DOCKER_USER,
                env,
            ),
            key: resolve_optional_credential(
                overrides.docker_key.as_deref(),
                cache,
                DOCKER_KEY,
                env,
            ),
        }
    }

    /// Returns `(user, key)` only when both halves are present.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.key) {
            (Some(user), Some(key)) => Some((user.as_str(), key.as_str())),
            _ => None,
        }
    }
}

impl fmt::Debug for DockerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerAuth")
            .field("user", &self.user)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolves the optional Quay API token into request credentials.
pub fn resolve_quay_credentials(
    overrides: &CredentialOverrides,
    cache: &CredentialCache,
    env: &dyn EnvSource,
) -> Credentials {
    match resolve_optional_credential(overrides.quay_token.as_deref(), cache, QUAY_TOKEN, env) {
        Some(token) => Credentials::bearer(token),
        None => Credentials::anonymous(),
    }
}
