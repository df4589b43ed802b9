//! Library configuration.
//!
//! This module holds the non-secret settings of the backends, with sensible
//! defaults, optionally merged with a YAML file. Secrets are never read from
//! here; see [`crate::auth`].

use crate::error::{DigestError, Result};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(test)]
mod tests;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub backends: Backends,
    #[serde(default)]
    pub quay: Quay,
    #[serde(default)]
    pub inspect: Inspect,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::Config;
    ///
    /// let config = Config::from_yaml_str("network:\n  timeout: 5\n").unwrap();
    /// assert_eq!(config.network.timeout, 5);
    /// assert_eq!(config.inspect.program, "skopeo");
    /// ```
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// Without a path the defaults are returned. A given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }
        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            DigestError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                DigestError::config_with_source("Failed to deserialize configuration", None, e)
            })
    }
}

/// HTTP settings shared by the Artifactory and Quay backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            max_idle_per_host: default_max_idle_per_host(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

fn default_max_idle_per_host() -> usize {
    10
}

/// Host markers used to pick a backend for an image reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Backends {
    /// Substring identifying an Artifactory-hosted repository
    #[serde(default = "default_artifactory_marker")]
    pub artifactory_marker: String,

    /// Prefix identifying a Quay repository
    #[serde(default = "default_quay_prefix")]
    pub quay_prefix: String,

    /// Prefix identifying a Docker Hub repository
    #[serde(default = "default_docker_prefix")]
    pub docker_prefix: String,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            artifactory_marker: default_artifactory_marker(),
            quay_prefix: default_quay_prefix(),
            docker_prefix: default_docker_prefix(),
        }
    }
}

fn default_artifactory_marker() -> String {
    "artifactory".to_string()
}

fn default_quay_prefix() -> String {
    "quay.io/".to_string()
}

fn default_docker_prefix() -> String {
    "docker.io".to_string()
}

/// Quay REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quay {
    #[serde(default = "default_quay_api_base")]
    pub api_base: String,
}

impl Default for Quay {
    fn default() -> Self {
        Self {
            api_base: default_quay_api_base(),
        }
    }
}

fn default_quay_api_base() -> String {
    "https://quay.io/api/v1/repository".to_string()
}

/// External inspection tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inspect {
    /// Program to run, looked up on `PATH` unless absolute
    #[serde(default = "default_inspect_program")]
    pub program: String,

    /// Value passed to `--override-os`
    #[serde(default = "default_override_os")]
    pub override_os: String,
}

impl Default for Inspect {
    fn default() -> Self {
        Self {
            program: default_inspect_program(),
            override_os: default_override_os(),
        }
    }
}

fn default_inspect_program() -> String {
    "skopeo".to_string()
}

fn default_override_os() -> String {
    "linux".to_string()
}
