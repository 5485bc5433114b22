//! Keep-alive HTTP endpoint tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use serde_json::Value;

use integration_tests::TestServer;

#[tokio::test]
async fn test_home_banner() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/").await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "🤖 Pokemon Auction Bot is running!");
    assert_eq!(body["status"], "running");
    assert!(body["uptime_seconds"].as_f64().unwrap() >= 0.0);
    assert!(body["uptime_minutes"].is_number());
    assert!(body["uptime_hours"].is_number());
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bot_status"], "running");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_status_reports_uptime() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/status").await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "running");
    assert!(body["start_time"].is_number());
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/nope").await.unwrap();
    assert_eq!(response.status(), 404);
}
