//! Backend selection.
//!
//! This module maps an image reference onto one of the three digest
//! backends and forwards calls to it. The set of backends is closed, so it
//! is an enum rather than a trait object: the choice is made once when the
//! backend is built and every call is a plain `match`.

use crate::artifactory::ArtifactoryRepo;
use crate::auth::{
    ArtifactoryAuth, CredentialCache, CredentialOverrides, DockerAuth, EnvSource, ProcessEnv,
    resolve_quay_credentials,
};
use crate::client::ClientConfig;
use crate::config::{Backends, Config};
use crate::digest::Digest;
use crate::error::{DigestError, Result};
use crate::oci::ManifestList;
use crate::quay::QuayRepo;
use crate::reference::ImageReference;
use crate::skopeo::{InspectRunner, ProcessRunner, SkopeoRepo};
use std::fmt;
use std::sync::Arc;
use tracing::debug;


/// The backend families an image can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Artifactory file store
    Artifactory,
    /// Quay REST API
    Quay,
    /// Docker Hub, inspected with skopeo
    Skopeo,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Artifactory => "artifactory",
            Self::Quay => "quay",
            Self::Skopeo => "skopeo",
        };
        f.write_str(name)
    }
}

/// Everything a backend may need besides the image itself.
///
/// The defaults read credentials from the process environment, share the
/// process-wide credential cache and run the real `skopeo`.
#[derive(Clone)]
pub struct ResolveContext {
    pub config: Config,
    pub overrides: CredentialOverrides,
    pub cache: CredentialCache,
    pub env: Arc<dyn EnvSource>,
    pub runner: Arc<dyn InspectRunner>,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            config: Config::default(),
            overrides: CredentialOverrides::default(),
            cache: CredentialCache::global(),
            env: Arc::new(ProcessEnv),
            runner: Arc::new(ProcessRunner),
        }
    }
}

impl fmt::Debug for ResolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("config", &self.config)
            .field("overrides", &self.overrides)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// A digest backend bound to one image.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Backend {
    Artifactory(ArtifactoryRepo),
    Quay(QuayRepo),
    Skopeo(SkopeoRepo),
}

impl Backend {
    /// Picks the backend family for a repository host.
    ///
    /// The checks run in a fixed order and the first match wins: the
    /// Artifactory marker anywhere in the host, then the Quay prefix, then
    /// the Docker Hub prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::config::Backends;
    /// use libregdigest::registry::{Backend, BackendKind};
    ///
    /// let markers = Backends::default();
    /// assert_eq!(Backend::classify("quay.io/openshift", &markers), Some(BackendKind::Quay));
    /// assert_eq!(Backend::classify("gcr.io/distroless", &markers), None);
    /// ```
    pub fn classify(repository_host: &str, markers: &Backends) -> Option<BackendKind> {
        if repository_host.contains(&markers.artifactory_marker) {
            Some(BackendKind::Artifactory)
        } else if repository_host.starts_with(&markers.quay_prefix) {
            Some(BackendKind::Quay)
        } else if repository_host.starts_with(&markers.docker_prefix) {
            Some(BackendKind::Skopeo)
        } else {
            None
        }
    }

    /// Builds the backend for `image`, resolving the credentials it needs.
    ///
    /// # Errors
    ///
    /// - [`DigestError::UnsupportedBackend`] if the host matches no family
    /// - [`DigestError::MissingCredentials`] if Artifactory settings are incomplete
    pub fn resolve(image: ImageReference, ctx: &ResolveContext) -> Result<Self> {
        let kind = Self::classify(image.repository_host(), &ctx.config.backends)
            .ok_or_else(|| DigestError::unsupported_backend(image.repository_host()))?;
        debug!(image = %image, backend = %kind, "selected backend");

        let client_config = ClientConfig::from(&ctx.config.network);
        let backend = match kind {
            BackendKind::Artifactory => {
                let auth = ArtifactoryAuth::resolve(&ctx.overrides, &ctx.cache, ctx.env.as_ref())?;
                Self::Artifactory(ArtifactoryRepo::new(image, auth, client_config)?)
            }
            BackendKind::Quay => {
                let credentials =
                    resolve_quay_credentials(&ctx.overrides, &ctx.cache, ctx.env.as_ref());
                Self::Quay(QuayRepo::new(
                    image,
                    &ctx.config.quay.api_base,
                    ctx.config.backends.quay_prefix.clone(),
                    credentials,
                    client_config,
                )?)
            }
            BackendKind::Skopeo => {
                let auth = DockerAuth::resolve(&ctx.overrides, &ctx.cache, ctx.env.as_ref());
                Self::Skopeo(SkopeoRepo::new(
                    image,
                    auth,
                    ctx.config.inspect.clone(),
                    ctx.config.backends.docker_prefix.clone(),
                    ctx.runner.clone(),
                ))
            }
        };
        Ok(backend)
    }

    /// Returns the family of this backend.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Artifactory(_) => BackendKind::Artifactory,
            Self::Quay(_) => BackendKind::Quay,
            Self::Skopeo(_) => BackendKind::Skopeo,
        }
    }

    /// Returns the image the backend is bound to.
    pub fn image(&self) -> &ImageReference {
        match self {
            Self::Artifactory(repo) => repo.image(),
            Self::Quay(repo) => repo.image(),
            Self::Skopeo(repo) => repo.image(),
        }
    }

    /// Returns the digest of the single-image manifest.
    pub async fn image_digest(&self) -> Result<Digest> {
        match self {
            Self::Artifactory(repo) => repo.image_digest().await,
            Self::Quay(repo) => repo.image_digest().await,
            Self::Skopeo(repo) => repo.image_digest().await,
        }
    }

    /// Returns the digest of the manifest list.
    pub async fn manifest_list_digest(&self) -> Result<Digest> {
        match self {
            Self::Artifactory(repo) => repo.manifest_list_digest().await,
            Self::Quay(repo) => repo.manifest_list_digest().await,
            Self::Skopeo(repo) => repo.manifest_list_digest().await,
        }
    }

    /// Returns the manifest list document.
    pub async fn raw_manifest_list(&self) -> Result<ManifestList> {
        match self {
            Self::Artifactory(repo) => repo.raw_manifest_list().await,
            Self::Quay(repo) => repo.raw_manifest_list().await,
            Self::Skopeo(repo) => repo.raw_manifest_list().await,
        }
    }
}
