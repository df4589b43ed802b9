use super::store::*;
use std::thread;

#[test]
fn test_credential_cache_new_is_empty() {
    let cache = CredentialCache::new();
    assert!(cache.keys().is_empty());
    assert!(cache.get("ARTIFACTORY_USER").is_none());
}

#[test]
fn test_credential_cache_set_and_get() {
    let cache = CredentialCache::new();
    cache.set("ARTIFACTORY_USER", "deployer");
    assert_eq!(cache.get("ARTIFACTORY_USER").as_deref(), Some("deployer"));
}

#[test]
fn test_credential_cache_set_replaces_value() {
    let cache = CredentialCache::new();
    cache.set("DOCKER_USER", "old");
    cache.set("DOCKER_USER", "new");
    assert_eq!(cache.get("DOCKER_USER").as_deref(), Some("new"));
    assert_eq!(cache.keys(), vec!["DOCKER_USER".to_string()]);
}

#[test]
fn test_credential_cache_remove_and_clear() {
    let cache = CredentialCache::new();
    cache.set("A", "1");
    cache.set("B", "2");

    assert_eq!(cache.remove("A").as_deref(), Some("1"));
    assert!(cache.get("A").is_none());

    cache.clear();
    assert!(cache.keys().is_empty());
}

#[test]
fn test_credential_cache_clones_share_entries() {
    let cache = CredentialCache::new();
    let clone = cache.clone();
    clone.set("ARTIFACTORY_KEY", "s3cr3t");
    assert_eq!(cache.get("ARTIFACTORY_KEY").as_deref(), Some("s3cr3t"));
}

#[test]
fn test_credential_cache_instances_are_isolated() {
    let first = CredentialCache::new();
    let second = CredentialCache::new();
    first.set("ARTIFACTORY_USER", "deployer");
    assert!(second.get("ARTIFACTORY_USER").is_none());
}

#[test]
fn test_credential_cache_global_is_shared() {
    let key = "REGDIGEST_TEST_GLOBAL_SHARED";
    CredentialCache::global().set(key, "value");
    assert_eq!(CredentialCache::global().get(key).as_deref(), Some("value"));
    CredentialCache::global().remove(key);
}

#[test]
fn test_credential_cache_concurrent_writers() {
    let cache = CredentialCache::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            thread::spawn(move || cache.set(&format!("KEY_{}", i), "v"))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.keys().len(), 8);
}

#[test]
fn test_credential_cache_debug_hides_values() {
    let cache = CredentialCache::new();
    cache.set("ARTIFACTORY_KEY", "s3cr3t");
    let debug = format!("{:?}", cache);
    assert!(debug.contains("ARTIFACTORY_KEY"));
    assert!(!debug.contains("s3cr3t"));
}

#[test]
fn test_static_env_lookup() {
    let env = StaticEnv::new().with("DOCKER_USER", "ci-bot");
    assert_eq!(env.get("DOCKER_USER").as_deref(), Some("ci-bot"));
    assert!(env.get("DOCKER_KEY").is_none());
}

#[test]
fn test_process_env_missing_variable() {
    assert!(ProcessEnv.get("REGDIGEST_TEST_SURELY_UNSET_VARIABLE").is_none());
}
