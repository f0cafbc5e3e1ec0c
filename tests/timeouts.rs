//! Timeout and cancellation behavior against a server that never answers.

mod common;

use common::{client_at, silent_server};
use patternos_sdk::prelude::*;
use std::time::{Duration, Instant};

fn request() -> AdRequest {
    AdRequest::new("user-42", PageContext::new("search").with_search_query("oat milk"))
        .with_slot(AdSlot::new("hero", SlotType::HeroBanner))
}

#[tokio::test]
async fn test_request_ads_times_out_near_configured_duration() {
    let (url, _server) = silent_server().await;
    let client = client_at(&url, Duration::from_millis(300));

    let start = Instant::now();
    let err = client.request_ads(&request()).await.unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(
        err.request_failure(),
        Some(RequestFailure::Timeout { timeout_ms: 300 })
    ));
    assert_eq!(err.failure_class(), Some(FailureClass::Timeout));
    assert!(elapsed >= Duration::from_millis(250), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "returned too late: {elapsed:?}");
}

#[tokio::test]
async fn test_read_queries_time_out() {
    let (url, _server) = silent_server().await;
    let client = client_at(&url, Duration::from_millis(200));

    let err = client.get_user_intent("user-42").await.unwrap_err();
    assert_eq!(err.failure_class(), Some(FailureClass::Timeout));
    let err = client.list_campaigns().await.unwrap_err();
    assert_eq!(err.failure_class(), Some(FailureClass::Timeout));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let (url, _server) = silent_server().await;
    let client = client_at(&url, Duration::from_secs(5));
    let token = CancellationToken::new();

    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = client
        .request_ads_with_cancel(&request(), &token)
        .await
        .unwrap_err();

    assert!(matches!(err.request_failure(), Some(RequestFailure::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_cancelled_tracking_returns_quietly() {
    let (url, _server) = silent_server().await;
    let client = client_at(&url, Duration::from_secs(5));
    let token = CancellationToken::new();
    token.cancel();

    let start = Instant::now();
    client
        .track_event_with_cancel(&TrackingEvent::impression("user-42"), &token)
        .await;
    assert!(start.elapsed() < Duration::from_secs(1));
}
