//! Content digests produced by digest resolution.
//!
//! This module wraps `oci_spec::image::Digest` and narrows it to the only
//! form regdigest ever hands back: `sha256:` followed by 64 lowercase hex
//! characters.

use crate::error::{DigestError, Result};
use oci_spec::image::{Digest as OciDigest, DigestAlgorithm};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;


/// A SHA-256 content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl Digest {
    /// Builds a digest from a bare hex hash, as stored by artifact repositories.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::Digest;
    ///
    /// let hex = "7173b809ca12ec5dee4506cd86be934c4596dd234ee82c0662eac04a8c2c71dc";
    /// let digest = Digest::from_sha256_hex(hex).unwrap();
    /// assert_eq!(digest.to_string(), format!("sha256:{}", hex));
    /// ```
    pub fn from_sha256_hex(hex: &str) -> Result<Self> {
        Self::from_str(&format!("sha256:{}", hex.trim()))
    }

    /// Computes the digest of raw document bytes.
    pub fn compute(bytes: &[u8]) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_sha256_hex(&format!("{:x}", hasher.finalize()))
    }

    /// Returns the hex part of the digest, without the algorithm prefix.
    pub fn hex(&self) -> &str {
        self.0.digest()
    }
}

fn is_lower_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| DigestError::Validation {
            message: format!("Invalid digest format: {}", e),
            source: Some(Box::new(e)),
        })?;

        if !matches!(oci_digest.algorithm(), DigestAlgorithm::Sha256) {
            return Err(DigestError::validation(format!(
                "Unsupported digest algorithm in '{}'. Only sha256 is supported",
                s
            )));
        }
        if !is_lower_hex(oci_digest.digest()) {
            return Err(DigestError::validation(format!(
                "Invalid sha256 digest '{}': expected 64 lowercase hex characters",
                s
            )));
        }

        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
