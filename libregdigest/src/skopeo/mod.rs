//! Docker Hub backend, resolved with `skopeo inspect`.
//!
//! The hub is not queried directly. Instead the image is inspected twice at
//! most: once in raw form to learn whether the tag is a manifest list, and
//! once more in resolved form when the digest of a single image is wanted.

mod command;

pub use command::{InspectCommand, InspectOutput, InspectRunner, ProcessRunner};

use crate::auth::DockerAuth;
use crate::config::Inspect;
use crate::digest::Digest;
use crate::error::{DigestError, Result};
use crate::oci::{ManifestList, is_manifest_list_media_type};
use crate::reference::ImageReference;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

#[cfg(test)]
mod command_tests;

/// The part of skopeo's resolved output we read.
#[derive(Debug, Deserialize)]
struct ResolvedInspect {
    #[serde(rename = "Digest")]
    digest: String,
}

/// Digest resolution by inspecting images with an external tool.
#[derive(Clone)]
pub struct SkopeoRepo {
    image: ImageReference,
    auth: DockerAuth,
    settings: Inspect,
    hub_prefix: String,
    runner: Arc<dyn InspectRunner>,
}

impl SkopeoRepo {
    /// Creates the adapter.
    ///
    /// `hub_prefix` is removed from the reference before inspection, since
    /// skopeo resolves bare names against the hub itself.
    pub fn new(
        image: ImageReference,
        auth: DockerAuth,
        settings: Inspect,
        hub_prefix: impl Into<String>,
        runner: Arc<dyn InspectRunner>,
    ) -> Self {
        Self {
            image,
            auth,
            settings,
            hub_prefix: hub_prefix.into(),
            runner,
        }
    }

    /// Returns the image this adapter resolves.
    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    /// Returns the image name handed to skopeo.
    pub fn inspect_target(&self) -> String {
        let image = self.image.to_string();
        let prefix = format!("{}/", self.hub_prefix.trim_end_matches('/'));
        match image.strip_prefix(&prefix) {
            Some(rest) => rest.to_string(),
            None => image,
        }
    }

    /// Builds the inspect command, adding credentials only if both halves are known.
    pub fn command(&self, raw: bool) -> InspectCommand {
        let command = InspectCommand::new(&self.settings.program, self.inspect_target())
            .override_os(&self.settings.override_os)
            .raw(raw);
        match self.auth.pair() {
            Some((user, key)) => command.credentials(user, key),
            None => command,
        }
    }

    /// Returns the digest of the single-image manifest.
    ///
    /// # Errors
    ///
    /// - [`DigestError::AmbiguousDigest`] if the tag is a manifest list
    /// - [`DigestError::ManifestNotFound`] if inspection fails
    pub async fn image_digest(&self) -> Result<Digest> {
        self.digest(false).await
    }

    /// Returns the digest of the manifest list.
    ///
    /// # Errors
    ///
    /// - [`DigestError::ManifestListNotFound`] if the tag is a single image or
    ///   inspection fails
    pub async fn manifest_list_digest(&self) -> Result<Digest> {
        self.digest(true).await
    }

    /// Returns the raw manifest list.
    ///
    /// Every failure, including skopeo errors and unparseable output, is
    /// reported as [`DigestError::ManifestListNotFound`].
    pub async fn raw_manifest_list(&self) -> Result<ManifestList> {
        let target = self.inspect_target();
        let raw = self.inspect(true, true).await?;

        let list = ManifestList::from_bytes(&raw).map_err(|e| {
            DigestError::manifest_list_not_found(format!("{}: {}", target, e))
        })?;

        if list.is_manifest_list() {
            Ok(list)
        } else {
            Err(DigestError::manifest_list_not_found(format!(
                "{} has media type {}",
                target,
                list.media_type().unwrap_or("(none)")
            )))
        }
    }

    async fn digest(&self, manifest_list: bool) -> Result<Digest> {
        let raw = self.inspect(true, manifest_list).await?;
        let document: Value = serde_json::from_slice(&raw).map_err(|e| {
            DigestError::validation_with_source(
                format!("Failed to parse raw manifest of {}", self.image),
                e,
            )
        })?;
        let media_type = document
            .get("mediaType")
            .and_then(Value::as_str)
            .unwrap_or("");
        debug!(image = %self.image, media_type, "classified manifest");

        if is_manifest_list_media_type(media_type) {
            if manifest_list {
                // The list digest is the hash of the exact bytes the registry serves.
                Digest::compute(&raw)
            } else {
                Err(DigestError::ambiguous_digest(format!(
                    "{} is a manifest list; request the manifest list digest or a platform-specific image",
                    self.image
                )))
            }
        } else if manifest_list {
            Err(DigestError::manifest_list_not_found(format!(
                "Manifest List does not exist for {}",
                self.image
            )))
        } else {
            let resolved = self.inspect(false, false).await?;
            let inspect: ResolvedInspect = serde_json::from_slice(&resolved).map_err(|e| {
                DigestError::validation_with_source(
                    format!("Failed to parse inspect output of {}", self.image),
                    e,
                )
            })?;
            Digest::from_str(&inspect.digest)
        }
    }

    /// Runs one inspection, mapping failures to the not-found kind of the request.
    async fn inspect(&self, raw: bool, manifest_list: bool) -> Result<Vec<u8>> {
        let command = self.command(raw);
        let output = self
            .runner
            .run(&command)
            .await
            .map_err(|e| DigestError::not_found(manifest_list, e.to_string()))?;

        if !output.success {
            debug!(command = %command, stderr = %output.stderr, "inspection failed");
            return Err(DigestError::not_found(
                manifest_list,
                format!("{}: {}", command, output.stderr),
            ));
        }

        Ok(output.stdout)
    }
}

impl std::fmt::Debug for SkopeoRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkopeoRepo")
            .field("image", &self.image)
            .field("auth", &self.auth)
            .field("settings", &self.settings)
            .field("hub_prefix", &self.hub_prefix)
            .finish_non_exhaustive()
    }
}
