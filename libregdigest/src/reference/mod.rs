//! Image references as seen by the digest backends.
//!
//! Backends address images by four plain strings rather than a parsed OCI
//! reference: the registry-qualified repository prefix used to pick a
//! backend, the namespace below the registry, the image name and the tag.
//! Parsing from a string goes through `oci_spec::distribution::Reference`.

use crate::error::{DigestError, Result};
use oci_spec::distribution::Reference as OciReference;
use std::fmt;
use std::str::FromStr;


const DEFAULT_TAG: &str = "latest";

/// An immutable image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    repository_host: String,
    repository_path: String,
    image_name: String,
    tag: String,
}

impl ImageReference {
    /// Creates a reference from its parts.
    ///
    /// # Arguments
    ///
    /// * `repository_host` - Registry plus namespace, e.g. `quay.io/openshift`
    /// * `repository_path` - Namespace below the registry, e.g. `openshift`
    /// * `image_name` - Last path component of the image, e.g. `origin-cli`
    /// * `tag` - Tag to resolve, e.g. `4.12`
    ///
    /// # Errors
    ///
    /// Returns a validation error if any part is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::ImageReference;
    ///
    /// let image = ImageReference::new("quay.io/openshift", "openshift", "origin-cli", "4.12").unwrap();
    /// assert_eq!(image.to_string(), "quay.io/openshift/origin-cli:4.12");
    /// ```
    pub fn new(
        repository_host: impl Into<String>,
        repository_path: impl Into<String>,
        image_name: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<Self> {
        let reference = Self {
            repository_host: repository_host.into(),
            repository_path: repository_path.into(),
            image_name: image_name.into(),
            tag: tag.into(),
        };

        for (field, value) in [
            ("repository host", &reference.repository_host),
            ("repository path", &reference.repository_path),
            ("image name", &reference.image_name),
            ("tag", &reference.tag),
        ] {
            if value.trim().is_empty() {
                return Err(DigestError::validation(format!(
                    "Image reference {} cannot be empty",
                    field
                )));
            }
        }

        Ok(reference)
    }

    /// Returns the registry-qualified repository prefix.
    pub fn repository_host(&self) -> &str {
        &self.repository_host
    }

    /// Returns the namespace below the registry.
    pub fn repository_path(&self) -> &str {
        &self.repository_path
    }

    /// Returns the image name.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// Returns the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for ImageReference {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_reference = OciReference::from_str(s).map_err(|e| DigestError::Validation {
            message: format!("Invalid image reference: {}", e),
            source: Some(Box::new(e)),
        })?;

        let tag = match (oci_reference.tag(), oci_reference.digest()) {
            (Some(tag), _) => tag,
            (None, Some(_)) => {
                return Err(DigestError::validation(format!(
                    "Image reference '{}' must name a tag, not a digest",
                    s
                )));
            }
            (None, None) => DEFAULT_TAG,
        };

        let (namespace, name) = oci_reference
            .repository()
            .rsplit_once('/')
            .ok_or_else(|| {
                DigestError::validation(format!(
                    "Image reference '{}' has no repository namespace",
                    s
                ))
            })?;

        Self::new(
            format!("{}/{}", oci_reference.registry(), namespace),
            namespace,
            name,
            tag,
        )
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.repository_host, self.image_name, self.tag)
    }
}
