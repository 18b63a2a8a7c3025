mod common;

use common::*;
use futures_util::StreamExt;
use serde_json::json;
use tokio_tungstenite::connect_async;

#[tokio::test]
async fn subscriber_receives_current_lobby_first() {
    let server = spawn_test_server().await;
    let code = server.create_lobby("Alice").await;

    let mut ws = subscribe(&server, &code).await;

    let msg = recv(&mut ws).await;
    assert_eq!(msg["type"], "lobby_updated");
    assert_eq!(msg["lobby"]["code"], code.as_str());
    assert_eq!(msg["lobby"]["players"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn subscriber_sees_join_and_game_progress() {
    let server = spawn_test_server().await;
    let code = server.create_lobby("Alice").await;
    let mut ws = subscribe(&server, &code).await;
    recv(&mut ws).await;

    server.join(&code, "Bob").await;
    let msg = recv(&mut ws).await;
    assert_eq!(msg["type"], "lobby_updated");
    assert_eq!(
        msg["lobby"]["players"][1],
        json!({ "name": "Bob", "isHost": false })
    );

    server.act(&code, "start", "Alice").await;
    let msg = recv(&mut ws).await;
    assert_eq!(msg["lobby"]["gameState"], "countdown");

    server
        .post(&format!("/api/lobby/{code}/start-round"), json!({}))
        .await;
    let msg = recv(&mut ws).await;
    assert_eq!(msg["lobby"]["gameState"], "role-assignment");
    assert_eq!(msg["lobby"]["word"], "ocean");
}

#[tokio::test]
async fn rejected_actions_are_not_pushed() {
    let server = spawn_test_server().await;
    let code = server.create_lobby("Alice").await;
    let mut ws = subscribe(&server, &code).await;
    recv(&mut ws).await;

    // Forbidden start, then a valid join
    let (status, _) = server.act(&code, "start", "Mallory").await;
    assert_eq!(status, 403);
    server.join(&code, "Bob").await;

    let msg = recv(&mut ws).await;
    assert_eq!(msg["lobby"]["players"].as_array().unwrap().len(), 2);
    assert_eq!(msg["lobby"]["started"], false);
}

#[tokio::test]
async fn host_leaving_closes_subscription() {
    let server = spawn_test_server().await;
    let code = server.lobby_with_bob().await;
    let mut ws = subscribe(&server, &code).await;
    recv(&mut ws).await;

    server.act(&code, "leave", "Alice").await;

    let msg = recv(&mut ws).await;
    assert_eq!(msg, json!({ "type": "lobby_closed" }));

    // Server closes the socket after lobby_closed
    loop {
        match ws.next().await {
            None | Some(Err(_)) => break,
            Some(Ok(frame)) if frame.is_close() => break,
            Some(Ok(_)) => continue,
        }
    }
}

#[tokio::test]
async fn subscribing_to_unknown_lobby_fails() {
    let server = spawn_test_server().await;

    let url = server.ws_url("/api/lobby/ZZZZ9999/events");
    let result = connect_async(&url).await;

    assert!(result.is_err());
}
