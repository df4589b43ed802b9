use super::*;
use mockito::Matcher;

const LIST_DIGEST: &str =
    "sha256:deadbeef00000000000000000000000000000000000000000000000000000000";
const IMAGE_DIGEST: &str =
    "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f";

fn repo(api_base: &str) -> QuayRepo {
    let image = ImageReference::new("quay.io/openshift", "openshift", "origin-cli", "4.12").unwrap();
    QuayRepo::new(
        image,
        api_base,
        "quay.io/",
        Credentials::anonymous(),
        ClientConfig::new().with_timeout(5),
    )
    .unwrap()
}

fn tag_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("onlyActiveTags".into(), "true".into()),
        Matcher::UrlEncoded("specificTag".into(), "4.12".into()),
    ])
}

async fn serve(server: &mut mockito::ServerGuard, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/openshift/origin-cli/tag/")
        .match_query(tag_query())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn single_tag(is_manifest_list: bool, digest: &str) -> String {
    format!(
        r#"{{"tags":[{{"name":"4.12","is_manifest_list":{},"manifest_digest":"{}"}}],"page":1,"has_additional":false}}"#,
        is_manifest_list, digest
    )
}

#[test]
fn test_quay_repository_strips_host_prefix() {
    let repo = repo("https://quay.io/api/v1/repository");
    assert_eq!(repo.quay_repository(), "openshift/origin-cli");
}

#[tokio::test]
async fn test_manifest_list_digest_for_list_tag() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve(&mut server, 200, &single_tag(true, LIST_DIGEST)).await;

    let digest = repo(&server.url()).manifest_list_digest().await.unwrap();
    assert_eq!(digest.to_string(), LIST_DIGEST);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_image_digest_for_list_tag_is_manifest_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 200, &single_tag(true, LIST_DIGEST)).await;

    let err = repo(&server.url()).image_digest().await.unwrap_err();
    assert!(matches!(err, DigestError::ManifestNotFound { .. }));
    assert!(err.to_string().contains("is a manifest list"));
}

#[tokio::test]
async fn test_image_digest_for_single_image_tag() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 200, &single_tag(false, IMAGE_DIGEST)).await;

    let repo = repo(&server.url());
    let first = repo.image_digest().await.unwrap();
    let second = repo.image_digest().await.unwrap();
    assert_eq!(first.to_string(), IMAGE_DIGEST);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_manifest_list_digest_for_single_image_tag() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 200, &single_tag(false, IMAGE_DIGEST)).await;

    let err = repo(&server.url()).manifest_list_digest().await.unwrap_err();
    assert!(matches!(err, DigestError::ManifestListNotFound { .. }));
    assert!(err.to_string().contains("is not manifest list"));
}

#[tokio::test]
async fn test_zero_tags_matches_requested_kind() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/openshift/origin-cli/tag/")
        .match_query(tag_query())
        .with_status(200)
        .with_body(r#"{"tags":[]}"#)
        .expect(2)
        .create_async()
        .await;

    let repo = repo(&server.url());
    assert!(matches!(
        repo.manifest_list_digest().await.unwrap_err(),
        DigestError::ManifestListNotFound { .. }
    ));
    assert!(matches!(
        repo.image_digest().await.unwrap_err(),
        DigestError::ManifestNotFound { .. }
    ));
}

#[tokio::test]
async fn test_more_than_one_tag_is_a_failure() {
    let body = format!(
        r#"{{"tags":[{{"is_manifest_list":true,"manifest_digest":"{}"}},{{"is_manifest_list":true,"manifest_digest":"{}"}}]}}"#,
        LIST_DIGEST, LIST_DIGEST
    );
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 200, &body).await;

    let err = repo(&server.url()).manifest_list_digest().await.unwrap_err();
    assert!(matches!(err, DigestError::Backend { .. }));
    assert!(err.to_string().contains("Expected 1 tag, found 2"));
}

#[tokio::test]
async fn test_forbidden_is_missing_credentials() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 403, r#"{"error":"Unauthorized"}"#).await;

    let err = repo(&server.url()).image_digest().await.unwrap_err();
    assert!(matches!(err, DigestError::MissingCredentials { .. }));
}

#[tokio::test]
async fn test_not_found_matches_requested_kind() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/openshift/origin-cli/tag/")
        .match_query(tag_query())
        .with_status(404)
        .with_body(r#"{"error_message":"Not Found"}"#)
        .expect(2)
        .create_async()
        .await;

    let repo = repo(&server.url());
    assert!(matches!(
        repo.manifest_list_digest().await.unwrap_err(),
        DigestError::ManifestListNotFound { .. }
    ));
    assert!(matches!(
        repo.image_digest().await.unwrap_err(),
        DigestError::ManifestNotFound { .. }
    ));
}

#[tokio::test]
async fn test_other_status_carries_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 502, "bad gateway").await;

    let err = repo(&server.url()).image_digest().await.unwrap_err();
    match err {
        DigestError::Backend {
            message,
            status_code,
        } => {
            assert_eq!(message, "bad gateway");
            assert_eq!(status_code, Some(502));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_digest_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve(&mut server, 200, &single_tag(false, "md5:1234")).await;

    let err = repo(&server.url()).image_digest().await.unwrap_err();
    assert!(matches!(err, DigestError::Validation { .. }));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/openshift/origin-cli/tag/")
        .match_query(tag_query())
        .match_header("authorization", "Bearer robot-token")
        .with_status(200)
        .with_body(single_tag(false, IMAGE_DIGEST))
        .create_async()
        .await;

    let image = ImageReference::new("quay.io/openshift", "openshift", "origin-cli", "4.12").unwrap();
    let repo = QuayRepo::new(
        image,
        &server.url(),
        "quay.io/",
        Credentials::bearer("robot-token"),
        ClientConfig::new(),
    )
    .unwrap();

    assert!(repo.image_digest().await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_raw_manifest_list_is_unsupported() {
    let err = repo("https://quay.io/api/v1/repository")
        .raw_manifest_list()
        .await
        .unwrap_err();
    assert!(matches!(err, DigestError::Unsupported { .. }));
}
