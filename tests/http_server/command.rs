use headcount::models::CommandKind;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn known_command_is_accepted_and_enqueued() {
    let mut server = TestServer::new().await;

    let resp = server
        .post("/command")
        .json(&json!({ "command": "!plr", "channel_id": 7, "requester_id": 42 }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(resp.status(), 202);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "accepted");

    let event = server.command_rx.recv().await.expect("No event enqueued");
    assert_eq!(event.kind, CommandKind::Report);
    assert_eq!(event.channel_id, 7);
    assert_eq!(event.requester_id, 42);

    server.cleanup();
}

#[tokio::test]
async fn unknown_command_is_rejected() {
    let server = TestServer::new().await;

    let resp = server
        .post("/command")
        .json(&json!({ "command": "!help", "channel_id": 7, "requester_id": 42 }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(resp.status(), 422);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Unknown command '!help'");

    server.cleanup();
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let server = TestServer::new().await;

    let resp = server
        .post("/command")
        .json(&json!({ "command": "!plr" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(resp.status(), 422);

    server.cleanup();
}

#[tokio::test]
async fn full_queue_returns_service_unavailable() {
    let server = TestServer::with_command_capacity(1).await;

    // Nothing drains command_rx here, so the second submission overflows.
    let first = server
        .post("/command")
        .json(&json!({ "command": "!db", "channel_id": 1, "requester_id": 1 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(first.status(), 202);

    let second = server
        .post("/command")
        .json(&json!({ "command": "!db", "channel_id": 1, "requester_id": 1 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(second.status(), 503);

    server.cleanup();
}
