//! Relay Integration Tests
//!
//! Boot the relay on an ephemeral port and drive it over real WebSockets.
//!
//! Run with: cargo test -p integration-tests --test relay_tests

use integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// HTTP Surface
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_issue_session_id() {
    let server = TestServer::start().await.unwrap();

    let first: Value = server.get("/session").await.unwrap().json().await.unwrap();
    let second: Value = server.get("/session").await.unwrap().json().await.unwrap();

    let first = first["sessionId"].as_str().unwrap().to_string();
    let second = second["sessionId"].as_str().unwrap().to_string();
    assert_eq!(first.len(), 10);
    assert_ne!(first, second);

    // Issuing a token does not create a session
    assert!(server.state().session_count() == 0);
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_missing_session_id_is_rejected() {
    let server = TestServer::start().await.unwrap();

    for query in ["", "?role=publisher", "?sessionId=", "?sessionId=%20%20"] {
        let mut client = server.connect_query(query).await.unwrap();
        assert_eq!(client.close_code().await.unwrap(), Some(4001), "query {query:?}");
    }

    assert!(server.state().session_count() == 0);
    server
        .wait_until(|state| state.transport().connection_count() == 0)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_roles_are_counted() {
    let server = TestServer::start().await.unwrap();

    let _p = server.join("s1", "publisher").await.unwrap();
    let _v1 = server.join("s1", "viewer").await.unwrap();
    let _v2 = server.join("s1", "PUBLISHER").await.unwrap();

    let session = server.state().session("s1").unwrap();
    assert_eq!(session.publisher_count(), 1);
    assert_eq!(session.viewer_count(), 2);
}

// ============================================================================
// Relay
// ============================================================================

#[tokio::test]
async fn test_event_reaches_every_member_including_sender() {
    let server = TestServer::start().await.unwrap();
    let mut publisher = server.join("s1", "publisher").await.unwrap();
    let mut viewer = server.join("s1", "viewer").await.unwrap();

    let event = json!({"type": "emoji", "data": {"emoji": "🔥"}, "ts": 1_700_000_000_000_u64});
    publisher.send_event(event.clone()).await.unwrap();

    assert_eq!(viewer.next_event().await.unwrap(), event);
    assert_eq!(publisher.next_event().await.unwrap(), event);
}

#[tokio::test]
async fn test_late_joiner_catches_up() {
    let server = TestServer::start().await.unwrap();
    let mut publisher = server.join("abc", "publisher").await.unwrap();

    publisher
        .send_event(json!({"type": "state", "data": {"score": 5}}))
        .await
        .unwrap();
    publisher.next_event().await.unwrap();

    let mut viewer = server.join("abc", "viewer").await.unwrap();
    assert_eq!(
        viewer.next_event().await.unwrap(),
        json!({"type": "state", "data": {"score": 5}})
    );

    // The catch-up went to the joiner alone
    publisher.expect_silence().await.unwrap();

    // Live traffic follows the catch-up
    publisher
        .send_event(json!({"type": "goal", "data": {"n": 1}}))
        .await
        .unwrap();
    assert_eq!(
        viewer.next_event().await.unwrap(),
        json!({"type": "goal", "data": {"n": 1}})
    );
}

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    let server = TestServer::start().await.unwrap();
    let mut publisher = server.join("s1", "publisher").await.unwrap();
    let mut viewer = server.join("s1", "viewer").await.unwrap();

    publisher
        .send_event(json!({"type": "state", "data": {"x": 1}}))
        .await
        .unwrap();
    viewer.next_event().await.unwrap();

    publisher.send_event(json!("state")).await.unwrap();
    publisher.send_event(Value::Null).await.unwrap();
    publisher.send_event(json!([1, 2, 3])).await.unwrap();
    publisher.send_raw("not json at all").await.unwrap();
    publisher
        .send_raw(r#"{"event":"other","data":{"type":"state","data":{"x":9}}}"#)
        .await
        .unwrap();

    // Connection stays open and the next valid event is the first one seen
    publisher
        .send_event(json!({"type": "train", "data": {"level": 2}}))
        .await
        .unwrap();
    assert_eq!(
        viewer.next_event().await.unwrap(),
        json!({"type": "train", "data": {"level": 2}})
    );

    let session = server.state().session("s1").unwrap();
    assert_eq!(session.last_state(), Some(&json!({"x": 1})));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.join("room-a", "publisher").await.unwrap();
    let mut b = server.join("room-b", "viewer").await.unwrap();

    a.send_event(json!({"type": "emoji", "data": "a"})).await.unwrap();
    b.send_event(json!({"type": "emoji", "data": "b"})).await.unwrap();

    assert_eq!(a.next_event().await.unwrap(), json!({"type": "emoji", "data": "a"}));
    assert_eq!(b.next_event().await.unwrap(), json!({"type": "emoji", "data": "b"}));
    a.expect_silence().await.unwrap();
    b.expect_silence().await.unwrap();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_session_lifecycle_scenario() {
    let server = TestServer::start().await.unwrap();

    let mut publisher = server.join("s1", "publisher").await.unwrap();
    let mut v1 = server.join("s1", "viewer").await.unwrap();
    v1.expect_silence().await.unwrap();

    publisher
        .send_event(json!({"type": "state", "data": {"x": 1}}))
        .await
        .unwrap();
    assert_eq!(
        v1.next_event().await.unwrap(),
        json!({"type": "state", "data": {"x": 1}})
    );

    v1.close().await.unwrap();
    server
        .wait_until(|state| {
            state
                .session("s1")
                .is_some_and(|s| s.viewer_count() == 0)
        })
        .await
        .unwrap();

    publisher.close().await.unwrap();
    server
        .wait_until(|state| state.session("s1").is_none())
        .await
        .unwrap();

    let mut v2 = server.join("s1", "viewer").await.unwrap();
    v2.expect_silence().await.unwrap();
    assert!(server.state().session("s1").unwrap().last_state().is_none());
}

#[tokio::test]
async fn test_shutdown_closes_live_connections() {
    use relay_gateway::protocol::CloseCode;

    let server = TestServer::start().await.unwrap();
    let mut publisher = server.join("s1", "publisher").await.unwrap();
    let mut viewer = server.join("s1", "viewer").await.unwrap();

    assert_eq!(server.state().transport().close_all(CloseCode::ServerShutdown), 2);

    assert_eq!(publisher.close_code().await.unwrap(), Some(4002));
    assert_eq!(viewer.close_code().await.unwrap(), Some(4002));
    server
        .wait_until(|state| state.session_count() == 0)
        .await
        .unwrap();
}
