//! Credential sources: the process-wide cache and the environment.
//!
//! Both are abstractions so tests can run against isolated instances. The
//! cache is a lock-guarded map shared by clones; [`CredentialCache::global`]
//! hands out the one instance the whole process shares.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// Read-only key lookup used as the last credential fallback.
pub trait EnvSource: Send + Sync {
    /// Returns the value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables.
///
/// # Examples
///
/// ```
/// use libregdigest::auth::{EnvSource, StaticEnv};
///
/// let env = StaticEnv::new().with("DOCKER_USER", "ci-bot");
/// assert_eq!(env.get("DOCKER_USER").as_deref(), Some("ci-bot"));
/// assert!(env.get("DOCKER_KEY").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for StaticEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Shared key-value store of resolved credentials.
///
/// Clones share the same entries. Safe to use from several threads.
#[derive(Clone, Default)]
pub struct CredentialCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

static GLOBAL_CACHE: OnceLock<CredentialCache> = OnceLock::new();

impl CredentialCache {
    /// Creates an empty, isolated cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    pub fn global() -> Self {
        GLOBAL_CACHE.get_or_init(CredentialCache::new).clone()
    }

    /// Returns the cached value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }

    /// Removes the value for `key`.
    pub fn remove(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key)
    }

    /// Drops every cached value.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    /// Lists the keys that currently have a value.
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("keys", &self.keys())
            .finish()
    }
}
