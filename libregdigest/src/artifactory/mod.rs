//! Artifactory backend.
//!
//! Artifactory stores a pushed Docker image as plain files under a path
//! derived from the repository host:
//!
//! ```text
//! <base>/<first host label>/<host path>/<image>/<tag>/manifest.json
//! <base>/<first host label>/<host path>/<image>/<tag>/list.manifest.json
//! ```
//!
//! Digests are read from the file checksums kept by the storage API, so no
//! manifest has to be downloaded to resolve one.

use crate::auth::{ArtifactoryAuth, Credentials};
use crate::client::{Client, ClientConfig, HttpResponse};
use crate::digest::Digest;
use crate::error::{DigestError, Result};
use crate::oci::ManifestList;
use crate::reference::ImageReference;
use serde::Deserialize;
use tracing::{debug, warn};


const MANIFEST_FILE: &str = "manifest.json";
const LIST_MANIFEST_FILE: &str = "list.manifest.json";
const STORAGE_API: &str = "api/storage";

/// Response of the storage info endpoint.
#[derive(Debug, Deserialize)]
struct StorageInfo {
    checksums: Checksums,
}

#[derive(Debug, Deserialize)]
struct Checksums {
    sha256: Option<String>,
}

/// Rewrites a repository host into the storage path prefix.
///
/// Everything before the first `.` becomes the leading segment and everything
/// after the first `/` is kept as the rest of the path. A host with no `.`
/// before its first `/` therefore keeps its whole text as the leading segment.
///
/// # Examples
///
/// ```
/// use libregdigest::artifactory::storage_repository;
///
/// assert_eq!(storage_repository("docker-local.artifactory.example.com/team/base"), "docker-local/team/base");
/// assert_eq!(storage_repository("docker-local.artifactory.example.com"), "docker-local");
/// ```
pub fn storage_repository(repository_host: &str) -> String {
    let first_label = repository_host
        .split('.')
        .next()
        .unwrap_or(repository_host);
    match repository_host.split_once('/') {
        Some((_, rest)) if !rest.trim_matches('/').is_empty() => {
            format!("{}/{}", first_label, rest.trim_matches('/'))
        }
        _ => first_label.to_string(),
    }
}

/// Digest resolution against an Artifactory Docker repository.
#[derive(Debug, Clone)]
pub struct ArtifactoryRepo {
    image: ImageReference,
    auth: ArtifactoryAuth,
    client: Client,
}

impl ArtifactoryRepo {
    /// Creates the adapter. The HTTP client is rooted at the resolved base URL.
    pub fn new(image: ImageReference, auth: ArtifactoryAuth, config: ClientConfig) -> Result<Self> {
        let client = Client::with_config(&auth.base, config)?;
        Ok(Self {
            image,
            auth,
            client,
        })
    }

    /// Returns the image this adapter resolves.
    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    /// Returns the repository-relative path of a file stored next to the image.
    pub fn file_path(&self, file: &str) -> String {
        [
            storage_repository(self.image.repository_host()).as_str(),
            self.image.image_name(),
            self.image.tag(),
            file,
        ]
        .join("/")
    }

    fn credentials(&self) -> Credentials {
        self.auth.credentials()
    }

    /// Returns the digest of the single-image manifest.
    ///
    /// # Errors
    ///
    /// - [`DigestError::ManifestNotFound`] if `manifest.json` does not exist
    /// - [`DigestError::MissingCredentials`] if Artifactory rejects the credentials
    pub async fn image_digest(&self) -> Result<Digest> {
        self.stat_sha256(MANIFEST_FILE, false).await
    }

    /// Returns the digest of the manifest list.
    ///
    /// # Errors
    ///
    /// - [`DigestError::ManifestListNotFound`] if `list.manifest.json` does not exist
    /// - [`DigestError::MissingCredentials`] if Artifactory rejects the credentials
    pub async fn manifest_list_digest(&self) -> Result<Digest> {
        self.stat_sha256(LIST_MANIFEST_FILE, true).await
    }

    /// Downloads and parses `list.manifest.json`.
    ///
    /// Any failure to read the file, whatever the cause, is reported as
    /// [`DigestError::ManifestListNotFound`]. Only a body that is not JSON
    /// yields a validation error.
    pub async fn raw_manifest_list(&self) -> Result<ManifestList> {
        let path = self.file_path(LIST_MANIFEST_FILE);
        let url = self.client.url(&[&path]);

        let response = self
            .client
            .get(&url, &[], &self.credentials())
            .await
            .map_err(|e| DigestError::manifest_list_not_found(format!("{}: {}", path, e)))?;

        if !response.is_success() {
            return Err(DigestError::manifest_list_not_found(format!(
                "{} (HTTP {}): {}",
                path,
                response.status,
                response.text()
            )));
        }

        ManifestList::from_bytes(&response.body)
    }

    async fn stat_sha256(&self, file: &str, manifest_list: bool) -> Result<Digest> {
        let path = self.file_path(file);
        let url = self.client.url(&[STORAGE_API, &path]);
        debug!(path = %path, "stat artifactory file");

        let response = self.client.get(&url, &[], &self.credentials()).await?;
        let response = Self::check_status(response, &path, manifest_list)?;

        let info: StorageInfo = serde_json::from_slice(&response.body).map_err(|e| {
            DigestError::validation_with_source(
                format!("Failed to parse storage info for {}", path),
                e,
            )
        })?;

        let sha256 = info.checksums.sha256.ok_or_else(|| {
            DigestError::validation(format!("Artifactory has no sha256 checksum for {}", path))
        })?;

        Digest::from_sha256_hex(&sha256)
    }

    fn check_status(response: HttpResponse, path: &str, manifest_list: bool) -> Result<HttpResponse> {
        match response.status {
            200 => Ok(response),
            404 => Err(DigestError::not_found(
                manifest_list,
                format!("{} does not exist", path),
            )),
            401 | 403 => Err(DigestError::missing_credentials(format!(
                "Artifactory rejected credentials for {} (HTTP {}): {}",
                path,
                response.status,
                response.text()
            ))),
            status => {
                warn!(status, path, "unexpected artifactory response");
                Err(DigestError::backend(response.text(), Some(status)))
            }
        }
    }
}
