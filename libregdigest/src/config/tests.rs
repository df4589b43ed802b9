use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.network.timeout, 30);
    assert_eq!(config.network.max_idle_per_host, 10);

    assert_eq!(config.backends.artifactory_marker, "artifactory");
    assert_eq!(config.backends.quay_prefix, "quay.io/");
    assert_eq!(config.backends.docker_prefix, "docker.io");

    assert_eq!(config.quay.api_base, "https://quay.io/api/v1/repository");

    assert_eq!(config.inspect.program, "skopeo");
    assert_eq!(config.inspect.override_os, "linux");
}

#[test]
fn test_from_str_empty_yaml() {
    let config = Config::from_yaml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_str_partial_yaml() {
    let yaml = r#"
network:
  timeout: 60
quay:
  api_base: http://localhost:8080/api/v1/repository
inspect:
  program: /usr/local/bin/skopeo
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(config.network.timeout, 60);
    assert_eq!(
        config.quay.api_base,
        "http://localhost:8080/api/v1/repository"
    );
    assert_eq!(config.inspect.program, "/usr/local/bin/skopeo");

    // Untouched values keep their defaults
    assert_eq!(config.network.max_idle_per_host, 10);
    assert_eq!(config.inspect.override_os, "linux");
    assert_eq!(config.backends, Backends::default());
}

#[test]
fn test_from_str_invalid_yaml() {
    let yaml = "network:\n  timeout: not-a-number\n";
    let result = Config::from_yaml_str(yaml);
    assert!(matches!(result.unwrap_err(), DigestError::Config { .. }));
}

#[test]
fn test_load_without_path_returns_defaults() {
    let config = Config::load(None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
    writeln!(file, "backends:\n  artifactory_marker: jfrog").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.backends.artifactory_marker, "jfrog");
    assert_eq!(config.backends.quay_prefix, "quay.io/");
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    assert!(Config::load(Some(&path)).is_err());
}
