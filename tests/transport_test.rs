//! Integration tests for the transport client: bearer injection, error
//! normalization, and the 401 session wipe.

use std::sync::Arc;
use std::time::Duration;

use motoforum_client::client::{ApiClient, SessionStatus};
use motoforum_client::config::Config;
use motoforum_client::constants::messages;
use motoforum_client::credentials::CredentialStore;
use motoforum_client::error::{ApiError, ConflictKind};
use motoforum_client::models::Post;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(server: &MockServer) -> (Arc<CredentialStore>, Arc<ApiClient>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = Arc::new(CredentialStore::new(dir.path()));
    let config = Config {
        api_base_url: server.uri(),
        request_timeout: Duration::from_millis(500),
        credentials_dir: dir.path().to_path_buf(),
    };
    let client = Arc::new(ApiClient::new(&config, Arc::clone(&credentials)));
    (credentials, client, dir)
}

fn sample_post() -> serde_json::Value {
    json!({
        "id": 1,
        "title": "Oil change intervals",
        "head": "How often?",
        "body": "Full synthetic every 10k km.",
        "status": "published",
        "user_id": 3,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_bearer_header_attached_when_token_present() {
    let server = MockServer::start().await;
    let (credentials, client, _dir) = setup(&server);
    credentials.store_token("token123").unwrap();

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .and(header("Authorization", "Bearer token123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post()))
        .expect(1)
        .mount(&server)
        .await;

    let post: Post = client.get("/posts/1").await.expect("request failed");
    assert_eq!(post.id, 1);
}

#[tokio::test]
async fn test_no_bearer_header_without_token() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post()))
        .mount(&server)
        .await;

    let post: Post = client.get("/posts/1").await.expect("request failed");
    assert_eq!(post.id, 1);

    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.headers.contains_key("Authorization")));
}

#[tokio::test]
async fn test_validation_error_surfaces_first_field_message() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": {
                "title": ["title must be at least 3 characters"],
                "body": ["body is required"]
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .post::<Post, _>("/posts", &json!({"title": "x"}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "title must be at least 3 characters");
}

#[tokio::test]
async fn test_conflict_code_maps_to_friendly_message() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/user/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint \"users_name_unique\"",
            "code": "users_name_unique"
        })))
        .mount(&server)
        .await;

    let err = client
        .post::<serde_json::Value, _>("/user/register", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Conflict(ConflictKind::Username));
    assert_eq!(err.to_string(), messages::USERNAME_TAKEN);
}

#[tokio::test]
async fn test_database_code_maps_to_fixed_message() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "SQLSTATE[08006] connection failure",
            "code": "database_error"
        })))
        .mount(&server)
        .await;

    let err = client.get::<serde_json::Value>("/posts/all").await.unwrap_err();
    assert_eq!(err, ApiError::Database);
    assert_eq!(err.to_string(), messages::DATABASE_ERROR);
}

#[tokio::test]
async fn test_server_message_surfaced_verbatim() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/posts/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Post not found"
        })))
        .mount(&server)
        .await;

    let err = client.get::<Post>("/posts/99").await.unwrap_err();
    assert_eq!(err.to_string(), "Post not found");
}

#[tokio::test]
async fn test_bodyless_failure_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.get::<serde_json::Value>("/posts/all").await.unwrap_err();
    assert_eq!(err.to_string(), messages::SERVER_ERROR);
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let dir = TempDir::new().unwrap();
    let credentials = Arc::new(CredentialStore::new(dir.path()));
    let config = Config {
        // Nothing listens here.
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout: Duration::from_millis(500),
        credentials_dir: dir.path().to_path_buf(),
    };
    let client = ApiClient::new(&config, credentials);

    let err = client.get::<serde_json::Value>("/posts/all").await.unwrap_err();
    assert_eq!(err, ApiError::Network);
    assert_eq!(err.to_string(), messages::NETWORK);
}

#[tokio::test]
async fn test_timeout_surfaces_network_message() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get::<serde_json::Value>("/posts/all").await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
    assert_eq!(err.to_string(), messages::NETWORK);
}

#[tokio::test]
async fn test_401_wipes_credentials_and_signals_expiry() {
    let server = MockServer::start().await;
    let (credentials, client, _dir) = setup(&server);
    credentials.store_token("stale-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthenticated."
        })))
        .mount(&server)
        .await;

    let session = client.session();
    assert_eq!(*session.borrow(), SessionStatus::Active);

    let err = client.get::<serde_json::Value>("/posts/all").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    // Both persisted entries are gone and the expiry signal is up.
    assert!(credentials.token().is_none());
    assert!(credentials.user().is_none());
    assert!(!credentials.is_authenticated());
    assert_eq!(*session.borrow(), SessionStatus::Expired);
}

#[tokio::test]
async fn test_delete_discards_acknowledgement_body() {
    let server = MockServer::start().await;
    let (_credentials, client, _dir) = setup(&server);

    Mock::given(method("DELETE"))
        .and(path("/posts/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Post deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("/posts/4").await.expect("delete failed");
}
