//! ChatSession over a real WebSocket served by a local axum app.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::time::timeout;

use assetdesk_client::{ChatSession, ClientConfig, SessionEvent};
use assetdesk_core::{ChatRole, MessageId};

const WAIT: Duration = Duration::from_secs(5);

async fn chat(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(answer_questions)
}

/// Answers every text frame; closes on "bye".
async fn answer_questions(mut socket: WebSocket) {
    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(question) = message else {
            continue;
        };
        if question == "bye" {
            let _ = socket.send(Message::Close(None)).await;
            break;
        }
        let reply = serde_json::json!({
            "answer": format!("you said\\n{}", question),
            "sources": ["inventory.csv"],
        });
        if socket.send(Message::Text(reply.to_string())).await.is_err() {
            break;
        }
    }
}

async fn serve() -> String {
    let app = Router::new().route("/ws/chat", get(chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base: &str) -> ClientConfig {
    ClientConfig::new(base).with_reveal_interval(Duration::from_millis(1))
}

async fn next(session: &mut ChatSession) -> SessionEvent {
    timeout(WAIT, session.next_event())
        .await
        .expect("timed out waiting for session event")
}

async fn connected(base: &str) -> ChatSession {
    let mut session = ChatSession::new(&config(base)).unwrap();
    session.connect();
    assert_eq!(next(&mut session).await, SessionEvent::Connected);
    session
}

async fn wait_for_answer(session: &mut ChatSession) -> MessageId {
    let id = match next(session).await {
        SessionEvent::AnswerStarted(id) => id,
        other => panic!("Expected AnswerStarted, got {:?}", other),
    };
    loop {
        match next(session).await {
            SessionEvent::RevealAdvanced { .. } => {}
            SessionEvent::RevealFinished(done) => {
                assert_eq!(done, id);
                return id;
            }
            other => panic!("Unexpected event {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_question_and_answer() {
    let base = serve().await;
    let mut session = connected(&base).await;

    session.send_message("how many laptops?").unwrap();
    assert!(session.is_pending());

    let id = wait_for_answer(&mut session).await;
    assert!(!session.is_pending());

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[0].content, "how many laptops?");
    assert_eq!(messages[1].id, id);
    assert_eq!(messages[1].content, "you said\nhow many laptops?");
    assert_eq!(messages[1].sources(), ["inventory.csv".to_string()]);
}

#[tokio::test]
async fn test_server_close() {
    let base = serve().await;
    let mut session = connected(&base).await;

    session.send_message("bye").unwrap();
    assert_eq!(
        next(&mut session).await,
        SessionEvent::Disconnected { reason: None }
    );
    assert!(!session.is_connected());
    assert!(!session.is_pending());

    // A fresh connection works after the server hung up.
    session.connect();
    assert_eq!(next(&mut session).await, SessionEvent::Connected);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut session = ChatSession::new(&config(&base)).unwrap();
    session.connect();
    match next(&mut session).await {
        SessionEvent::Disconnected { reason: Some(_) } => {}
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(!session.is_connected());
}
