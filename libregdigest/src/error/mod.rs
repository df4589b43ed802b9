//! Error types for regdigest
//!
//! Every backend maps its own failures into [`DigestError`], so callers can
//! handle a missing manifest the same way whether it came from Artifactory,
//! Quay or skopeo.

use thiserror::Error;


/// Main error type for digest resolution
#[derive(Error, Debug)]
pub enum DigestError {
    /// A required secret could not be resolved, or the backend rejected the
    /// request as unauthenticated.
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    /// The single-image manifest does not exist, or the tag is a manifest list.
    #[error("Manifest not found: {message}")]
    ManifestNotFound { message: String },

    /// The manifest list does not exist, or the tag is a single image.
    #[error("Manifest list not found: {message}")]
    ManifestListNotFound { message: String },

    /// The repository host does not belong to any known backend family.
    #[error("Unsupported backend for repository host '{host}'")]
    UnsupportedBackend { host: String },

    /// A single-image digest was requested for a tag that is a manifest list.
    #[error("Ambiguous digest: {message}")]
    AmbiguousDigest { message: String },

    /// The selected backend does not implement the operation.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported { operation: String, backend: String },

    /// Any backend answer outside the classified kinds, with the raw payload.
    #[error("Backend error (status: {status_code:?}): {message}")]
    Backend {
        message: String,
        status_code: Option<u16>,
    },

    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors (malformed digest, unparseable document, bad reference)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for regdigest operations
pub type Result<T> = std::result::Result<T, DigestError>;

impl DigestError {
    /// Creates a new missing credentials error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    ///
    /// let err = DigestError::missing_credentials("ARTIFACTORY_KEY");
    /// assert!(matches!(err, DigestError::MissingCredentials { .. }));
    /// ```
    pub fn missing_credentials<S: Into<String>>(message: S) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Creates a new manifest not found error.
    pub fn manifest_not_found<S: Into<String>>(message: S) -> Self {
        Self::ManifestNotFound {
            message: message.into(),
        }
    }

    /// Creates a new manifest list not found error.
    pub fn manifest_list_not_found<S: Into<String>>(message: S) -> Self {
        Self::ManifestListNotFound {
            message: message.into(),
        }
    }

    /// Creates the not-found error matching the kind of digest requested.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    ///
    /// let err = DigestError::not_found(true, "no such tag");
    /// assert!(matches!(err, DigestError::ManifestListNotFound { .. }));
    ///
    /// let err = DigestError::not_found(false, "no such tag");
    /// assert!(matches!(err, DigestError::ManifestNotFound { .. }));
    /// ```
    pub fn not_found<S: Into<String>>(manifest_list: bool, message: S) -> Self {
        if manifest_list {
            Self::manifest_list_not_found(message)
        } else {
            Self::manifest_not_found(message)
        }
    }

    /// Creates a new unsupported backend error.
    pub fn unsupported_backend<S: Into<String>>(host: S) -> Self {
        Self::UnsupportedBackend { host: host.into() }
    }

    /// Creates a new ambiguous digest error.
    pub fn ambiguous_digest<S: Into<String>>(message: S) -> Self {
        Self::AmbiguousDigest {
            message: message.into(),
        }
    }

    /// Creates a new unsupported operation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    ///
    /// let err = DigestError::unsupported("raw manifest list", "quay");
    /// assert!(err.to_string().contains("quay"));
    /// ```
    pub fn unsupported<S: Into<String>>(operation: S, backend: S) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            backend: backend.into(),
        }
    }

    /// Creates a new generic backend error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    ///
    /// let err = DigestError::backend("internal server error", Some(500));
    /// assert!(matches!(err, DigestError::Backend { .. }));
    /// ```
    pub fn backend<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Backend {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new network error.
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = DigestError::network_with_source("failed to connect", io_err);
    /// assert!(matches!(err, DigestError::Network { .. }));
    /// ```
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::error::DigestError;
    ///
    /// let err = DigestError::config("invalid config file", Some("/path/to/config.yaml"));
    /// assert!(matches!(err, DigestError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for the two not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ManifestNotFound { .. } | Self::ManifestListNotFound { .. }
        )
    }
}
