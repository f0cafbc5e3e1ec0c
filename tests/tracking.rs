//! Tracking is best-effort: it must never fail the caller.

mod common;

use common::{client_at, silent_server, MockServerFixture, AGGREGATOR};
use mockito::Matcher;
use patternos_sdk::prelude::*;
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_track_event_adds_platform_and_timestamp() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/events/track")
        .match_header("x-api-key", common::API_KEY)
        .match_header("x-aggregator", AGGREGATOR)
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "event_type": "click",
                "user_id": "user-42",
                "campaign_id": "c1",
                "platform": AGGREGATOR
            })),
            Matcher::Regex(r#""timestamp":"\d{4}-\d{2}-\d{2}T"#.into()),
        ]))
        .with_status(202)
        .create_async()
        .await;

    fixture
        .client()
        .track_event(&TrackingEvent::click("user-42").with_campaign_id("c1"))
        .await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_track_event_swallows_server_errors() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/events/track")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    fixture
        .client()
        .track_event(&TrackingEvent::purchase("user-42", 12.5))
        .await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_track_event_swallows_connection_errors() {
    // Nothing listens on the discard port.
    let client = client_at("http://127.0.0.1:9", Duration::from_millis(500));
    client.track_event(&TrackingEvent::impression("user-42")).await;
}

#[tokio::test]
async fn test_track_event_swallows_timeouts() {
    let (url, _server) = silent_server().await;
    let client = client_at(&url, Duration::from_millis(200));

    let start = Instant::now();
    client.track_event(&TrackingEvent::view("user-42")).await;
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_blank_user_is_dropped_without_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/events/track")
        .expect(0)
        .create_async()
        .await;

    fixture
        .client()
        .track_event(&TrackingEvent::cart_add("  "))
        .await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_spawned_tracking_completes_in_background() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/events/track")
        .match_body(Matcher::PartialJson(json!({"event_type": "conversion", "revenue": 30.0})))
        .with_status(200)
        .create_async()
        .await;

    let handle = fixture
        .client()
        .spawn_track_event(TrackingEvent::conversion("user-42", 30.0).with_metadata("order", "o-1"));
    handle.await.expect("tracking task should not panic");
    mock.assert_async().await;
}
