// Token provider against a mocked client-credentials endpoint.

use mockito::{Matcher, Server};
use pm10_monitor::auth::{AuthError, TokenProvider};

fn provider(token_url: String, secret: &str) -> TokenProvider {
    TokenProvider::new(
        reqwest::Client::new(),
        token_url,
        "antamina".to_string(),
        secret.to_string(),
    )
}

#[tokio::test]
async fn test_fetch_token_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("client_id".into(), "antamina".into()),
            Matcher::UrlEncoded("client_secret".into(), "s3cr3t".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"abc.def.ghi","expires_in":300,"token_type":"Bearer"}"#)
        .create_async()
        .await;

    let token = provider(server.url() + "/token", "s3cr3t")
        .fetch_token()
        .await
        .expect("token request should succeed");

    assert_eq!(token, "abc.def.ghi");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_token_with_empty_secret_is_rejected() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded("client_secret".into(), "".into()))
        .with_status(401)
        .with_body(r#"{"error":"unauthorized_client"}"#)
        .create_async()
        .await;

    let result = provider(server.url() + "/token", "").fetch_token().await;

    match result {
        Err(AuthError::HttpStatus(status)) => assert_eq!(status, 401),
        other => panic!("Expected HttpStatus(401), got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_token_server_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/token")
        .with_status(503)
        .create_async()
        .await;

    let result = provider(server.url() + "/token", "s3cr3t").fetch_token().await;

    let err = result.expect_err("503 must fail authentication");
    assert!(matches!(err, AuthError::HttpStatus(503)));
    assert!(err.to_string().starts_with("Authentication failed"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_token_malformed_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"token":"missing-access-token-field"}"#)
        .create_async()
        .await;

    let result = provider(server.url() + "/token", "s3cr3t").fetch_token().await;

    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_token_unreachable_endpoint() {
    // Nothing listens on port 9 (discard) on a test machine.
    let result = provider("http://127.0.0.1:9/token".to_string(), "s3cr3t")
        .fetch_token()
        .await;

    assert!(matches!(result, Err(AuthError::Request(_))));
}
