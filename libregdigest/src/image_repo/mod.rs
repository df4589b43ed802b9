//! High-level API for resolving image digests.
//!
//! [`ImageRepo`] is the entry point most callers need: hand it an image
//! reference and ask for a digest. It picks the backend from the repository
//! host, resolves the credentials that backend needs and forwards every call.

use crate::auth::{CredentialCache, CredentialOverrides, EnvSource};
use crate::config::Config;
use crate::digest::Digest;
use crate::error::Result;
use crate::oci::ManifestList;
use crate::reference::ImageReference;
use crate::registry::{Backend, BackendKind, ResolveContext};
use crate::skopeo::InspectRunner;
use std::path::PathBuf;
use std::sync::Arc;


/// Digest queries for one image.
///
/// # Examples
///
/// ## Basic Usage
///
/// ```no_run
/// use libregdigest::ImageRepo;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = ImageRepo::new("quay.io/openshift/origin-cli:4.14".parse()?)?;
///     let digest = repo.manifest_list_digest().await?;
///     println!("{}", digest);
///     Ok(())
/// }
/// ```
///
/// ## With Explicit Credentials
///
/// ```no_run
/// use libregdigest::ImageRepo;
/// use libregdigest::auth::CredentialOverrides;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let overrides = CredentialOverrides::new()
///         .artifactory_user("deployer")
///         .artifactory_key("s3cr3t")
///         .artifactory_base("https://repo.example.com/artifactory");
///
///     let repo = ImageRepo::builder()
///         .with_overrides(overrides)
///         .build("docker-local.artifactory.example.com/team/app:1.0".parse()?)?;
///     let digest = repo.image_digest().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ImageRepo {
    backend: Backend,
}

impl ImageRepo {
    /// Binds `image` to its backend using the default context.
    ///
    /// Credentials come from the process environment and the process-wide
    /// cache, and skopeo is run from `PATH`.
    ///
    /// # Errors
    ///
    /// - [`DigestError::UnsupportedBackend`](crate::DigestError::UnsupportedBackend)
    ///   if the host matches no backend family
    /// - [`DigestError::MissingCredentials`](crate::DigestError::MissingCredentials)
    ///   if the backend needs a secret nobody supplied
    pub fn new(image: ImageReference) -> Result<Self> {
        Self::with_context(image, &ResolveContext::default())
    }

    /// Binds `image` to its backend using `ctx`.
    pub fn with_context(image: ImageReference, ctx: &ResolveContext) -> Result<Self> {
        Ok(Self {
            backend: Backend::resolve(image, ctx)?,
        })
    }

    /// Create a builder for advanced configuration.
    pub fn builder() -> ImageRepoBuilder {
        ImageRepoBuilder::new()
    }

    /// Returns the selected backend family.
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Returns the image this repo resolves.
    pub fn image(&self) -> &ImageReference {
        self.backend.image()
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns the digest of the single-image manifest.
    pub async fn image_digest(&self) -> Result<Digest> {
        self.backend.image_digest().await
    }

    /// Returns the digest of the manifest list.
    pub async fn manifest_list_digest(&self) -> Result<Digest> {
        self.backend.manifest_list_digest().await
    }

    /// Returns the manifest list exactly as the backend serves it.
    pub async fn raw_manifest_list(&self) -> Result<ManifestList> {
        self.backend.raw_manifest_list().await
    }
}

/// Builder for an [`ImageRepo`] with custom configuration.
///
/// Anything not set falls back to [`ResolveContext::default`].
#[derive(Default)]
pub struct ImageRepoBuilder {
    config: Option<Config>,
    config_file: Option<PathBuf>,
    overrides: Option<CredentialOverrides>,
    cache: Option<CredentialCache>,
    env: Option<Arc<dyn EnvSource>>,
    runner: Option<Arc<dyn InspectRunner>>,
}

impl ImageRepoBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration directly.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a YAML file when building.
    ///
    /// Takes precedence over [`with_config`](Self::with_config).
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set explicit credentials, which win over cache and environment.
    pub fn with_overrides(mut self, overrides: CredentialOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Use `cache` instead of the process-wide credential cache.
    pub fn with_cache(mut self, cache: CredentialCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Read environment fallbacks from `env`.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Run skopeo inspections through `runner`.
    pub fn with_runner(mut self, runner: Arc<dyn InspectRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Assembles the context without binding an image.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config file cannot be loaded.
    pub fn context(self) -> Result<ResolveContext> {
        let defaults = ResolveContext::default();
        let config = match self.config_file {
            Some(path) => Config::load(Some(path.as_path()))?,
            None => self.config.unwrap_or(defaults.config),
        };

        Ok(ResolveContext {
            config,
            overrides: self.overrides.unwrap_or(defaults.overrides),
            cache: self.cache.unwrap_or(defaults.cache),
            env: self.env.unwrap_or(defaults.env),
            runner: self.runner.unwrap_or(defaults.runner),
        })
    }

    /// Build the [`ImageRepo`] for `image`.
    pub fn build(self, image: ImageReference) -> Result<ImageRepo> {
        let ctx = self.context()?;
        ImageRepo::with_context(image, &ctx)
    }
}
