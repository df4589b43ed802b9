//! Manifest list documents.
//!
//! Backends return manifest lists verbatim. [`ManifestList`] keeps the JSON
//! exactly as received and only offers read accessors on top of it.

pub use oci_spec::image::ImageIndex;

use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Docker schema 2 manifest list media type.
pub const DOCKER_MANIFEST_LIST: &str = "application/vnd.docker.distribution.manifest.list.v2+json";
/// OCI image index media type.
pub const OCI_IMAGE_INDEX: &str = "application/vnd.oci.image.index.v1+json";

/// Returns true if `media_type` names a Docker manifest list.
///
/// Only media types containing `manifest.list` qualify. An OCI image index
/// is treated like a single image.
///
/// # Examples
///
/// ```
/// use libregdigest::oci::is_manifest_list_media_type;
///
/// assert!(is_manifest_list_media_type("application/vnd.docker.distribution.manifest.list.v2+json"));
/// assert!(!is_manifest_list_media_type("application/vnd.oci.image.index.v1+json"));
/// assert!(!is_manifest_list_media_type("application/vnd.docker.distribution.manifest.v2+json"));
/// ```
pub fn is_manifest_list_media_type(media_type: &str) -> bool {
    media_type.contains("manifest.list")
}

/// A manifest list as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestList(Value);

impl ManifestList {
    /// Parses a manifest list from raw bytes without reshaping it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            DigestError::validation_with_source("Failed to parse manifest list JSON", e)
        })?;
        Ok(Self(value))
    }

    /// Returns the `mediaType` field, if present.
    pub fn media_type(&self) -> Option<&str> {
        self.0.get("mediaType").and_then(Value::as_str)
    }

    /// Returns true if the document declares a manifest list media type.
    pub fn is_manifest_list(&self) -> bool {
        self.media_type().is_some_and(is_manifest_list_media_type)
    }

    /// Returns the per-architecture manifest descriptors.
    pub fn manifests(&self) -> &[Value] {
        self.0
            .get("manifests")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the document as received.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the list, returning the document.
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Converts the document into a typed OCI image index.
    pub fn to_image_index(&self) -> Result<ImageIndex> {
        serde_json::from_value(self.0.clone())
            .map_err(|e| DigestError::validation_with_source("Failed to parse image index", e))
    }
}

impl From<Value> for ManifestList {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
