//! End-to-end proxy behavior against a scripted mock upstream
//!
//! Each test boots the real router on an ephemeral port, with both upstream
//! base URLs pointed at a local mock server that answers from a scripted
//! queue of (status, body) pairs and counts every request it receives.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hashfolio::config::Config;
use hashfolio::webserver::routes::create_router;
use hashfolio::webserver::state::AppState;

#[derive(Clone)]
struct MockUpstream {
    calls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<(u16, Value)>>>,
}

impl MockUpstream {
    fn new(script: Vec<(u16, Value)>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::from(script))),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn scripted_handler(State(mock): State<MockUpstream>) -> Response {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = mock
        .script
        .lock()
        .pop_front()
        .unwrap_or((200, json!({ "default": true })));
    (
        axum::http::StatusCode::from_u16(status).unwrap(),
        axum::Json(body),
    )
        .into_response()
}

/// Serve the scripted mock on an ephemeral port; returns its base URL
async fn spawn_mock(mock: MockUpstream) -> String {
    let app = Router::new()
        .route("/coins/markets", get(scripted_handler))
        .route("/simple/price", get(scripted_handler))
        .route("/api/coin/:slug", get(scripted_handler))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Boot the service against the given mock with test-friendly retry delays
async fn spawn_app(mock: &MockUpstream, configure: impl FnOnce(&mut Config)) -> String {
    let upstream_base = spawn_mock(mock.clone()).await;

    let mut config = Config::default();
    config.market.base_url = upstream_base.clone();
    config.mining.base_url = upstream_base;
    config.market.base_delay_ms = 10;
    config.mining.base_delay_ms = 10;
    configure(&mut config);

    let state = Arc::new(AppState::new(config).unwrap());
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn market_listing_second_request_is_a_cache_hit() {
    let listing = json!([{ "id": "bitcoin", "current_price": 64000.0 }]);
    let mock = MockUpstream::new(vec![(200, listing.clone())]);
    let base = spawn_app(&mock, |_| {}).await;

    let first = reqwest::get(format!("{}/api/market/coins?ids=bitcoin", base))
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 200);
    assert!(first.headers().get("x-cache").is_none());
    assert_eq!(
        first.headers().get("cache-control").unwrap(),
        "public, max-age=60"
    );
    assert_eq!(first.json::<Value>().await.unwrap(), listing);

    let second = reqwest::get(format!("{}/api/market/coins?ids=bitcoin", base))
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(second.headers().get("x-cache").unwrap(), "hit");
    assert_eq!(second.json::<Value>().await.unwrap(), listing);

    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn parameter_order_does_not_defeat_the_cache() {
    let mock = MockUpstream::new(vec![(200, json!([{ "id": "kaspa" }]))]);
    let base = spawn_app(&mock, |_| {}).await;

    let first = reqwest::get(format!(
        "{}/api/market/coins?ids=kaspa&vs_currency=usd",
        base
    ))
    .await
    .unwrap();
    assert_eq!(first.status().as_u16(), 200);

    let second = reqwest::get(format!(
        "{}/api/market/coins?vs_currency=usd&ids=kaspa",
        base
    ))
    .await
    .unwrap();
    assert_eq!(second.headers().get("x-cache").unwrap(), "hit");

    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn expired_entry_is_served_stale_when_upstream_rate_limits() {
    let payload = json!({ "coin": "kaspa", "network_hashrate": 1.1e15 });
    let mock = MockUpstream::new(vec![(200, payload.clone()), (429, json!({}))]);
    let base = spawn_app(&mock, |config| {
        // Expire immediately so the second request misses, and keep the 429
        // to a single attempt
        config.mining.ttl_secs = 0;
        config.mining.retries = 0;
    })
    .await;

    let first = reqwest::get(format!("{}/api/mining/coin/kaspa", base))
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 200);
    assert!(first.headers().get("x-cache").is_none());

    tokio::time::sleep(Duration::from_millis(20)).await;

    let second = reqwest::get(format!("{}/api/mining/coin/kaspa", base))
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(second.headers().get("x-cache").unwrap(), "stale");
    assert_eq!(second.json::<Value>().await.unwrap(), payload);

    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn unknown_coin_404_passes_through_without_retry() {
    let mock = MockUpstream::new(vec![(404, json!({ "message": "coin not found" }))]);
    let base = spawn_app(&mock, |_| {}).await;

    let response = reqwest::get(format!("{}/api/mining/coin/doesnotexist", base))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Mining stats error");
    assert!(body["details"].as_str().unwrap().contains("coin not found"));

    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn persistent_server_errors_surface_after_retries() {
    let mock = MockUpstream::new(vec![
        (503, json!({})),
        (503, json!({})),
        (503, json!({})),
    ]);
    let base = spawn_app(&mock, |_| {}).await;

    let response = reqwest::get(format!("{}/api/market/coins?ids=bitcoin", base))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(
        response.json::<Value>().await.unwrap()["error"],
        "Market data error"
    );

    // Initial attempt plus the two default retries
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn missing_ids_fails_fast_without_any_upstream_call() {
    let mock = MockUpstream::new(vec![]);
    let base = spawn_app(&mock, |_| {}).await;

    let listing = reqwest::get(format!("{}/api/market/coins", base))
        .await
        .unwrap();
    assert_eq!(listing.status().as_u16(), 400);
    let body = listing.json::<Value>().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("ids"));

    let price = reqwest::get(format!("{}/api/market/price?ids=", base))
        .await
        .unwrap();
    assert_eq!(price.status().as_u16(), 400);

    let slug = reqwest::get(format!("{}/api/mining/coin/%20", base))
        .await
        .unwrap();
    assert_eq!(slug.status().as_u16(), 400);

    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn price_lookup_uses_its_own_shorter_ttl() {
    let prices = json!({ "bitcoin": { "usd": 64000.0, "usd_market_cap": 1.26e12 } });
    let mock = MockUpstream::new(vec![(200, prices.clone())]);
    let base = spawn_app(&mock, |_| {}).await;

    let response = reqwest::get(format!(
        "{}/api/market/price?ids=bitcoin&vs_currencies=USD",
        base
    ))
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=30"
    );
    assert_eq!(response.json::<Value>().await.unwrap(), prices);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn health_and_ping_answer_locally() {
    let mock = MockUpstream::new(vec![]);
    let base = spawn_app(&mock, |_| {}).await;

    let health = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(health.status().as_u16(), 200);
    let body = health.json::<Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());

    let ping = reqwest::get(format!("{}/api/ping", base)).await.unwrap();
    assert_eq!(ping.status().as_u16(), 200);
    assert_eq!(ping.json::<Value>().await.unwrap()["message"], "ping");

    assert_eq!(mock.calls(), 0);
}
