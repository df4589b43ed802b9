//! regdigest - Container Image Digest Resolution Library
//!
//! regdigest answers one question for deployment tooling: what digest does
//! the registry hold for this image tag? It knows three kinds of backends
//! and hides their differences behind a single API.
//!
//! # Quick Start
//!
//! ```no_run
//! use libregdigest::{ImageReference, ImageRepo};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let image: ImageReference = "docker.io/library/nginx:1.25".parse()?;
//!     let repo = ImageRepo::new(image)?;
//!
//!     let digest = repo.manifest_list_digest().await?;
//!     println!("{}", digest);
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! The backend is chosen from the repository host, first match wins:
//!
//! - hosts containing `artifactory` read `manifest.json` and
//!   `list.manifest.json` checksums from an Artifactory file store
//! - hosts starting with `quay.io/` query the Quay tag API
//! - hosts starting with `docker.io` run `skopeo inspect`
//!
//! Anything else fails with [`DigestError::UnsupportedBackend`].
//!
//! # Credentials
//!
//! Secrets are taken from explicit overrides, then the process-wide
//! credential cache, then the environment (`ARTIFACTORY_USER`,
//! `ARTIFACTORY_KEY`, `ARTIFACTORY_BASE`, `DOCKER_USER`, `DOCKER_KEY`,
//! `QUAY_TOKEN`). Values read from the environment are cached for later
//! lookups.
//!
//! # Main Types
//!
//! - [`ImageRepo`] - Main entry point for digest queries
//! - [`ImageRepoBuilder`] - Builder for advanced configuration
//! - [`ImageReference`] - Image reference parsing
//! - [`Digest`] - `sha256:` content digest
//! - [`ManifestList`] - Manifest list document as served by the backend
//! - [`DigestError`] - Error kinds shared by every backend

#![warn(clippy::all)]

/// Returns the libregdigest crate version.
///
/// # Examples
///
/// ```
/// let version = libregdigest::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry point)
mod image_repo;
pub use image_repo::{ImageRepo, ImageRepoBuilder};

pub use auth::Credentials;
pub use config::Config;
pub use digest::Digest;
pub use error::{DigestError, Result};
pub use oci::ManifestList;
pub use reference::ImageReference;
pub use registry::{Backend, BackendKind, ResolveContext};

pub mod artifactory;
pub mod auth;
#[doc(hidden)]
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod oci;
pub mod quay;
pub mod reference;
pub mod registry;
pub mod skopeo;
