//! Shared fixtures for integration tests.
#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use patternos_sdk::{AdClient, Environment};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "pk_test_123";
pub const AGGREGATOR: &str = "freshmart";

/// Test fixture that owns a mock server and builds clients pointed at it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    pub fn client(&self) -> AdClient {
        client_at(&self.base_url, Duration::from_secs(2))
    }

    /// JSON response for `method path`, requiring the configured auth headers.
    pub async fn mock_json(&mut self, method: &str, path: Matcher, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_header("x-api-key", API_KEY)
            .match_header("x-aggregator", AGGREGATOR)
            .match_header("content-type", "application/json")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

pub fn client_at(base_url: &str, timeout: Duration) -> AdClient {
    AdClient::builder()
        .api_key(API_KEY)
        .aggregator(AGGREGATOR)
        .environment(Environment::Development)
        .api_url(base_url)
        .timeout(timeout)
        .build()
        .expect("client should build")
}

/// A TCP server that accepts connections and never answers.
pub async fn silent_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    (format!("http://{}", addr), handle)
}

pub fn ad_json(slot_id: &str, slot_type: &str, campaign_id: &str) -> serde_json::Value {
    serde_json::json!({
        "campaign_id": campaign_id,
        "campaign_name": "Autumn Oats",
        "brand": "Oatly",
        "bid_amount": 2.5,
        "actual_price": 2.01,
        "creative": {
            "type": "banner",
            "url": "https://cdn.example.com/oats.png",
            "headline": "Oat milk, 20% off",
            "description": "This week only"
        },
        "slot": {"id": slot_id, "type": slot_type},
        "click_url": format!("https://ads.example.com/click/{}", campaign_id),
        "auction_type": "second_price",
        "won_at": "2026-10-19T12:00:00Z"
    })
}
