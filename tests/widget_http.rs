use std::net::SocketAddr;
use std::sync::Arc;

use agri_chat::AppState;
use agri_chat::catalogue::SqliteCatalogue;
use agri_chat::config::AppConfig;
use agri_chat::server::build_router;
use agri_chat::widget::{APOLOGY, Author, ChatController, HttpTransport, MemoryView};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_app() -> SocketAddr {
    let catalogue = SqliteCatalogue::connect("sqlite::memory:").await.unwrap();
    let mut config = AppConfig::default();
    config.resilience.rate_limit_enabled = false;
    spawn(build_router(AppState::new(Arc::new(config), Arc::new(catalogue)))).await
}

#[tokio::test]
async fn test_scripted_backend_scenario() {
    let app = Router::new().route(
        "/chat",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body, json!({ "message": "hello" }));
            Json(json!({ "response": "hi **there**", "suggestions": ["bye"] }))
        }),
    );
    let addr = spawn(app).await;
    let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
    let mut controller = ChatController::new(MemoryView::new());

    assert!(controller.send("hello", &transport).await.is_sent());

    let view = controller.view();
    assert_eq!(view.typing_history, vec![true, false]);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[0].author(), Author::User);
    assert_eq!(view.messages[0].html(), "hello");
    assert_eq!(view.messages[1].html(), "hi <strong>there</strong>");
    assert_eq!(view.messages[1].suggestions(), ["bye"]);
}

#[tokio::test]
async fn test_conversation_against_real_server() {
    let addr = spawn_app().await;
    let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
    let mut controller = ChatController::new(MemoryView::new());

    controller.send("Bonjour", &transport).await;
    let greeting = controller.messages()[1].clone();
    assert_eq!(greeting.author(), Author::Bot);
    assert!(!greeting.suggestions().is_empty());

    let session_id = transport.session_id().expect("server hands out a session");

    let label = greeting.suggestions()[0].clone();
    controller.send_suggestion(&label, &transport).await;
    assert_eq!(controller.messages().len(), 4);
    assert_eq!(controller.messages()[2].text(), label);
    assert!(
        controller.messages()[3]
            .html()
            .contains("<strong>Périodes de plantation pour le Maïs :</strong>")
    );

    let log: Value = reqwest::get(format!("http://{addr}/api/sessions/{session_id}/messages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(log.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_error_becomes_apology() {
    let app = Router::new().route("/chat", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let addr = spawn(app).await;
    let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
    let mut controller = ChatController::new(MemoryView::new());

    controller.send("hello", &transport).await;

    let view = controller.view();
    assert!(!view.typing);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[1].text(), APOLOGY);
    assert!(view.messages[1].suggestions().is_empty());
}

#[tokio::test]
async fn test_malformed_reply_becomes_apology() {
    let app = Router::new().route("/chat", post(|| async { "not json" }));
    let addr = spawn(app).await;
    let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
    let mut controller = ChatController::new(MemoryView::new());

    controller.send("hello", &transport).await;
    assert_eq!(controller.messages()[1].text(), APOLOGY);
}

#[tokio::test]
async fn test_reply_without_response_text_becomes_apology() {
    for body in [
        json!({ "suggestions": ["bye"] }),
        json!({ "response": 42 }),
        json!({ "response": "hi", "suggestions": ["ok", 7] }),
    ] {
        let app = Router::new().route(
            "/chat",
            post(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let addr = spawn(app).await;
        let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
        let mut controller = ChatController::new(MemoryView::new());

        controller.send("hello", &transport).await;
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.messages()[1].text(), APOLOGY);
    }
}

#[tokio::test]
async fn test_connection_refused_becomes_apology() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
    let mut controller = ChatController::new(MemoryView::new());

    controller.send("hello", &transport).await;

    let view = controller.view();
    assert_eq!(view.typing_history, vec![true, false]);
    let apologies = view
        .messages
        .iter()
        .filter(|m| m.author() == Author::Bot)
        .count();
    assert_eq!(apologies, 1);
    assert_eq!(view.messages[1].text(), APOLOGY);
    assert!(!controller.is_waiting());
}
