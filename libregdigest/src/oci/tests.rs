use super::*;
use serde_json::json;

fn docker_list() -> Value {
    json!({
        "schemaVersion": 2,
        "mediaType": DOCKER_MANIFEST_LIST,
        "manifests": [
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 1570,
                "digest": "sha256:1b3e7c9a4f1f2d5c3e6a8b9d0c1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e",
                "platform": { "architecture": "amd64", "os": "linux" }
            },
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 1570,
                "digest": "sha256:2c4f8d0b5a2a3e6d4f7b9c0e1d2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f",
                "platform": { "architecture": "arm64", "os": "linux" }
            }
        ]
    })
}

#[test]
fn test_manifest_list_from_bytes_keeps_document() {
    let bytes = serde_json::to_vec(&docker_list()).unwrap();
    let list = ManifestList::from_bytes(&bytes).unwrap();
    assert_eq!(list.as_json(), &docker_list());
    assert_eq!(list.media_type(), Some(DOCKER_MANIFEST_LIST));
    assert!(list.is_manifest_list());
    assert_eq!(list.manifests().len(), 2);
}

#[test]
fn test_manifest_list_from_invalid_bytes_fails() {
    let err = ManifestList::from_bytes(b"<html>").unwrap_err();
    assert!(matches!(err, DigestError::Validation { .. }));
}

#[test]
fn test_single_manifest_is_not_a_list() {
    let list = ManifestList::from(json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json"
    }));
    assert!(!list.is_manifest_list());
    assert!(list.manifests().is_empty());
}

#[test]
fn test_missing_media_type() {
    let list = ManifestList::from(json!({ "schemaVersion": 2 }));
    assert_eq!(list.media_type(), None);
    assert!(!list.is_manifest_list());
}

#[test]
fn test_serializes_transparently() {
    let list = ManifestList::from(docker_list());
    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value, docker_list());
    assert_eq!(list.into_json(), docker_list());
}

#[test]
fn test_to_image_index() {
    let list = ManifestList::from(json!({
        "schemaVersion": 2,
        "mediaType": OCI_IMAGE_INDEX,
        "manifests": [
            {
                "mediaType": "application/vnd.oci.image.manifest.v1+json",
                "size": 7143,
                "digest": "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f",
                "platform": { "architecture": "amd64", "os": "linux" }
            }
        ]
    }));
    let index = list.to_image_index().unwrap();
    assert_eq!(index.manifests().len(), 1);
}

#[test]
fn test_oci_index_is_not_a_manifest_list() {
    assert!(!is_manifest_list_media_type(OCI_IMAGE_INDEX));
    let list = ManifestList::from(json!({
        "schemaVersion": 2,
        "mediaType": OCI_IMAGE_INDEX,
        "manifests": []
    }));
    assert!(!list.is_manifest_list());
}
