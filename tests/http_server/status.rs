use headcount::models::Sample;

use crate::helpers::*;

#[tokio::test]
async fn status_endpoint_returns_status_json() {
    let server = TestServer::new().await;

    let resp = server.get("/status").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].as_u64().is_some());
    assert_eq!(body["presence"], "");
    assert!(body["last_count"].is_null());
    assert!(body["last_sample_timestamp_secs"].is_null());
    assert_eq!(body["history_len"], 0);

    server.cleanup();
}

#[tokio::test]
async fn status_endpoint_reflects_runtime_state() {
    let server = TestServer::new().await;

    server.history.append(Sample::now(4800)).await.unwrap();
    server.history.append(Sample::now(5000)).await.unwrap();
    {
        let mut status = server.app_status.status.write().await;
        status.presence_text = "5,000 online players.".to_string();
        status.last_count = Some(5000);
        status.last_seen = Some(chrono::Utc::now());
    }

    let resp = server.get("/status").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["presence"], "5,000 online players.");
    assert_eq!(body["last_count"], 5000);
    assert!(body["last_sample_timestamp_secs"].as_i64().is_some());
    assert_eq!(body["history_len"], 2);

    server.cleanup();
}
