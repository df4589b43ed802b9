//! Quay backend.
//!
//! Quay exposes tag metadata, including whether a tag is a manifest list,
//! through its REST API:
//!
//! ```text
//! GET <api_base>/<namespace>/<image>/tag/?onlyActiveTags=true&specificTag=<tag>
//! ```
//!
//! The answer for a specific tag holds at most one entry.

use crate::auth::Credentials;
use crate::client::{Client, ClientConfig};
use crate::digest::Digest;
use crate::error::{DigestError, Result};
use crate::oci::ManifestList;
use crate::reference::ImageReference;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Response of the tag listing endpoint.
#[derive(Debug, Deserialize)]
struct TagListResponse {
    tags: Vec<TagInfo>,
}

/// One active tag.
#[derive(Debug, Deserialize)]
struct TagInfo {
    #[serde(default)]
    is_manifest_list: bool,
    manifest_digest: String,
}

/// Digest resolution through the Quay REST API.
#[derive(Debug, Clone)]
pub struct QuayRepo {
    image: ImageReference,
    client: Client,
    credentials: Credentials,
    host_prefix: String,
}

impl QuayRepo {
    /// Creates the adapter.
    ///
    /// # Arguments
    ///
    /// * `image` - Reference whose host starts with `host_prefix`
    /// * `api_base` - Repository API root, e.g. `https://quay.io/api/v1/repository`
    /// * `host_prefix` - Prefix stripped from the host to get the namespace, e.g. `quay.io/`
    /// * `credentials` - Anonymous, or a bearer token for private repositories
    pub fn new(
        image: ImageReference,
        api_base: &str,
        host_prefix: impl Into<String>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            image,
            client: Client::with_config(api_base, config)?,
            credentials,
            host_prefix: host_prefix.into(),
        })
    }

    /// Returns the image this adapter resolves.
    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    /// Returns the `<namespace>/<image>` path Quay knows the repository by.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::client::ClientConfig;
    /// use libregdigest::quay::QuayRepo;
    /// use libregdigest::{Credentials, ImageReference};
    ///
    /// let image = ImageReference::new("quay.io/openshift", "openshift", "origin-cli", "4.12").unwrap();
    /// let repo = QuayRepo::new(
    ///     image,
    ///     "https://quay.io/api/v1/repository",
    ///     "quay.io/",
    ///     Credentials::anonymous(),
    ///     ClientConfig::new(),
    /// ).unwrap();
    /// assert_eq!(repo.quay_repository(), "openshift/origin-cli");
    /// ```
    pub fn quay_repository(&self) -> String {
        let host = self.image.repository_host();
        let namespace = host.strip_prefix(&self.host_prefix).unwrap_or(host);
        format!("{}/{}", namespace.trim_matches('/'), self.image.image_name())
    }

    /// Returns the digest of the single-image manifest.
    pub async fn image_digest(&self) -> Result<Digest> {
        self.digest(false).await
    }

    /// Returns the digest of the manifest list.
    pub async fn manifest_list_digest(&self) -> Result<Digest> {
        self.digest(true).await
    }

    /// Raw manifest lists are not retrieved through the Quay API.
    pub async fn raw_manifest_list(&self) -> Result<ManifestList> {
        Err(DigestError::unsupported("raw manifest list retrieval", "quay"))
    }

    async fn digest(&self, manifest_list: bool) -> Result<Digest> {
        let tag = self.image.tag();
        let url = format!("{}/", self.client.url(&[&self.quay_repository(), "tag"]));
        debug!(url = %url, tag, manifest_list, "query quay tag");

        let response = self
            .client
            .get(
                &url,
                &[("onlyActiveTags", "true"), ("specificTag", tag)],
                &self.credentials,
            )
            .await?;

        match response.status {
            200 => {}
            403 => return Err(DigestError::missing_credentials(response.text())),
            404 => return Err(DigestError::not_found(manifest_list, response.text())),
            status => {
                warn!(status, url = %url, "unexpected quay response");
                return Err(DigestError::backend(response.text(), Some(status)));
            }
        }

        let listing: TagListResponse = serde_json::from_slice(&response.body).map_err(|e| {
            DigestError::validation_with_source("Failed to parse Quay tag response", e)
        })?;

        let entry = match listing.tags.as_slice() {
            [] => {
                return Err(DigestError::not_found(
                    manifest_list,
                    format!("Tag {} not found in {}", tag, self.quay_repository()),
                ));
            }
            [entry] => entry,
            tags => {
                return Err(DigestError::backend(
                    format!("Expected 1 tag, found {}. {}", tags.len(), response.text()),
                    Some(response.status),
                ));
            }
        };

        match (entry.is_manifest_list, manifest_list) {
            (true, true) | (false, false) => Digest::from_str(&entry.manifest_digest),
            (false, true) => Err(DigestError::manifest_list_not_found(format!(
                "Tag {} is not manifest list",
                tag
            ))),
            (true, false) => Err(DigestError::manifest_not_found(format!(
                "Tag {} is a manifest list",
                tag
            ))),
        }
    }
}
