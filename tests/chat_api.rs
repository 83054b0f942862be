use std::sync::Arc;

use agri_chat::AppState;
use agri_chat::catalogue::SqliteCatalogue;
use agri_chat::config::AppConfig;
use agri_chat::server::build_router;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

async fn test_server_with(config: AppConfig) -> TestServer {
    let catalogue = SqliteCatalogue::connect("sqlite::memory:")
        .await
        .expect("in-memory catalogue");
    let state = AppState::new(Arc::new(config), Arc::new(catalogue));
    TestServer::new(build_router(state)).expect("test server")
}

async fn test_server() -> TestServer {
    let mut config = AppConfig::default();
    config.resilience.rate_limit_enabled = false;
    test_server_with(config).await
}

#[tokio::test]
async fn test_chat_planting_reply() {
    let server = test_server().await;

    let response = server
        .post("/chat")
        .json(&json!({ "message": "Quand planter le sorgho ?" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("📅 **Périodes de plantation pour le Sorgho :**"));
    assert!(text.contains("Juin - juillet."));
    assert_eq!(body["source"], "catalogue (cultures)");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    assert!(body["session_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["timestamp"].as_str().unwrap().len(), 5);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let server = test_server().await;

    let response = server.post("/chat").json(&json!({ "message": "   " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_log_and_reset() {
    let server = test_server().await;

    let first: Value = server
        .post("/chat")
        .json(&json!({ "message": "Bonjour" }))
        .await
        .json();
    let session_id = first["session_id"].as_str().unwrap().to_string();

    server
        .post("/chat")
        .json(&json!({ "message": "merci", "session_id": session_id }))
        .await
        .assert_status_ok();

    let log: Value = server
        .get(&format!("/api/sessions/{session_id}/messages"))
        .await
        .json();
    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["user"], "Bonjour");
    assert_eq!(log[0]["source"], "salutation");
    assert_eq!(log[1]["source"], "remerciement");

    server
        .post(&format!("/api/sessions/{session_id}/reset"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let log: Value = server
        .get(&format!("/api/sessions/{session_id}/messages"))
        .await
        .json();
    assert!(log.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_session() {
    let server = test_server().await;

    server
        .get("/api/sessions/nope/messages")
        .await
        .assert_status_not_found();
    server
        .post("/api/sessions/nope/reset")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_widget_page_is_served() {
    let server = test_server().await;

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"id="user-input""#));
    assert!(html.contains(r#"id="chat-messages""#));
    assert!(html.contains(r#"id="typing-indicator""#));

    server.get("/static/chat.js").await.assert_status_ok();
}

#[tokio::test]
async fn test_health() {
    let server = test_server().await;
    let body: Value = server.get("/health").await.json();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_rate_limit() {
    let mut config = AppConfig::default();
    config.resilience.requests_per_second = 0.01;
    config.resilience.burst_size = 2.0;
    let server = test_server_with(config).await;

    server.get("/health").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let catalogue = SqliteCatalogue::connect("sqlite::memory:").await.unwrap();
    let mut config = AppConfig::default();
    config.resilience.rate_limit_enabled = false;
    let app = build_router(AppState::new(Arc::new(config), Arc::new(catalogue)));

    let response = app
        .oneshot(
            Request::post("/chat")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_one_shot_posts_keep_store_bounded() {
    let mut config = AppConfig::default();
    config.resilience.rate_limit_enabled = false;
    config.sessions.max_conversations = 40;
    let catalogue = SqliteCatalogue::connect("sqlite::memory:").await.unwrap();
    let state = AppState::new(Arc::new(config), Arc::new(catalogue));
    let server = TestServer::new(build_router(state.clone())).unwrap();

    for i in 0..120 {
        let body = if i % 2 == 0 {
            json!({ "message": "Bonjour" })
        } else {
            json!({ "message": "Bonjour", "session_id": uuid::Uuid::new_v4().to_string() })
        };
        server.post("/chat").json(&body).await.assert_status_ok();
    }

    assert_eq!(state.conversations.len(), 40);
}

#[tokio::test]
async fn test_sweeper_drops_idle_conversations() {
    use agri_chat::conversation::ConversationStore;
    use agri_chat::server::spawn_session_sweeper;
    use std::time::Duration;

    let store = ConversationStore::with_limits(Duration::from_millis(30), 100);
    store.create();
    store.create();

    let sweeper = spawn_session_sweeper(store.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(200)).await;
    sweeper.abort();

    assert!(store.is_empty());
}
