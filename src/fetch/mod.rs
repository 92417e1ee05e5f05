/// Retrying fetcher for outbound upstream calls
///
/// Performs one logical HTTP GET, masking transient upstream failure from
/// the caller: network-level errors and 429/5xx responses are retried with
/// exponential backoff, honoring an upstream-supplied `retry-after` hint.
/// Any other response (including non-429 4xx) is returned immediately for
/// the caller to inspect.
///
/// Each call is stateless and independent; concurrent calls share nothing
/// and back off on the tokio timer without blocking one another.
use reqwest::{header, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

use crate::logger::{self, LogTag};

/// Per-call retry configuration
///
/// `retries` is the number of additional attempts after the first, so the
/// default allows three attempts in total.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay_ms: u64) -> Self {
        Self {
            retries,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }
}

/// Wait duration before the retry following `attempt` (0-based)
///
/// A server-supplied `retry-after` value (whole seconds) takes precedence;
/// otherwise the delay doubles per attempt from `base_delay`. Pure function
/// so the timing schedule is testable without sleeping.
pub fn backoff_delay(attempt: u32, retry_after_secs: Option<u64>, base_delay: Duration) -> Duration {
    match retry_after_secs {
        Some(secs) => Duration::from_secs(secs),
        None => base_delay.saturating_mul(2u32.saturating_pow(attempt)),
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Integer-second `retry-after` hint, if the response carried one
fn retry_after_hint(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// GET `url`, retrying transient failures per `policy`
///
/// Returns the first non-retryable response, or after the retry budget is
/// spent, the last response received (even a retryable one) so the caller
/// can still inspect its status and body. A network error is propagated
/// only when no response was ever received.
pub async fn fetch_with_retry(
    client: &Client,
    url: Url,
    policy: &RetryPolicy,
) -> Result<Response, reqwest::Error> {
    let mut last_response: Option<Response> = None;
    let mut last_error: Option<reqwest::Error> = None;

    for attempt in 0..=policy.retries {
        logger::verbose(
            LogTag::Fetch,
            &format!("GET {} (attempt {}/{})", url, attempt + 1, policy.retries + 1),
        );
        let result = client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await;

        match result {
            Ok(response) if is_retryable(response.status()) => {
                let hint = retry_after_hint(&response);
                logger::debug(
                    LogTag::Fetch,
                    &format!(
                        "Attempt {}/{} to {} got {} (retry-after: {:?})",
                        attempt + 1,
                        policy.retries + 1,
                        url,
                        response.status(),
                        hint
                    ),
                );
                last_response = Some(response);
                if attempt < policy.retries {
                    tokio::time::sleep(backoff_delay(attempt, hint, policy.base_delay)).await;
                }
            }
            Ok(response) => return Ok(response),
            Err(err) => {
                logger::debug(
                    LogTag::Fetch,
                    &format!(
                        "Attempt {}/{} to {} failed: {}",
                        attempt + 1,
                        policy.retries + 1,
                        url,
                        err
                    ),
                );
                last_error = Some(err);
                if attempt < policy.retries {
                    tokio::time::sleep(backoff_delay(attempt, None, policy.base_delay)).await;
                }
            }
        }
    }

    if let Some(response) = last_response {
        return Ok(response);
    }
    match last_error {
        Some(err) => Err(err),
        // Unreachable in practice: the loop always records a response or an
        // error. Issue one last plain request rather than panicking.
        None => {
            client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::HeaderValue;
    use axum::response::{IntoResponse, Response as AxumResponse};
    use axum::routing::get;
    use axum::Router;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn backoff_doubles_per_attempt() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(0, None, base), Duration::from_millis(500));
        assert_eq!(backoff_delay(1, None, base), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2, None, base), Duration::from_millis(2000));
    }

    #[test]
    fn backoff_is_non_decreasing() {
        let base = Duration::from_millis(250);
        let mut previous = Duration::ZERO;
        for attempt in 0..10 {
            let delay = backoff_delay(attempt, None, base);
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn retry_after_hint_overrides_exponential_schedule() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(0, Some(1), base), Duration::from_secs(1));
        assert_eq!(backoff_delay(5, Some(3), base), Duration::from_secs(3));
    }

    // Scripted upstream: answers each request with the next (status,
    // retry-after) pair, then falls back to plain 200s.
    #[derive(Clone)]
    struct UpstreamState {
        calls: Arc<AtomicUsize>,
        script: Arc<Mutex<VecDeque<(u16, Option<&'static str>)>>>,
    }

    async fn scripted_handler(State(state): State<UpstreamState>) -> AxumResponse {
        state.calls.fetch_add(1, Ordering::SeqCst);
        let (status, retry_after) = state.script.lock().pop_front().unwrap_or((200, None));
        let mut response = (
            axum::http::StatusCode::from_u16(status).unwrap(),
            axum::Json(serde_json::json!({ "status": status })),
        )
            .into_response();
        if let Some(value) = retry_after {
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, HeaderValue::from_static(value));
        }
        response
    }

    async fn spawn_upstream(
        script: Vec<(u16, Option<&'static str>)>,
    ) -> (Url, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = UpstreamState {
            calls: calls.clone(),
            script: Arc::new(Mutex::new(VecDeque::from(script))),
        };
        let app = Router::new()
            .route("/data", get(scripted_handler))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let url = Url::parse(&format!("http://{}/data", addr)).unwrap();
        (url, calls)
    }

    #[tokio::test]
    async fn recovers_after_rate_limiting() {
        let (url, calls) = spawn_upstream(vec![(429, None), (429, None), (200, None)]).await;
        let client = Client::new();
        let policy = RetryPolicy::new(2, 20);

        let response = fetch_with_retry(&client, url, &policy).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn honors_retry_after_header() {
        let (url, calls) = spawn_upstream(vec![(429, Some("1")), (200, None)]).await;
        let client = Client::new();
        let policy = RetryPolicy::new(2, 10);

        let start = Instant::now();
        let response = fetch_with_retry(&client, url, &policy).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn non_retryable_status_returns_immediately() {
        let (url, calls) = spawn_upstream(vec![(404, None)]).await;
        let client = Client::new();
        let policy = RetryPolicy::new(2, 500);

        let start = Instant::now();
        let response = fetch_with_retry(&client, url, &policy).await.unwrap();

        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No backoff sleeps were taken
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_response() {
        let (url, calls) = spawn_upstream(vec![(500, None), (500, None), (500, None)]).await;
        let client = Client::new();
        let policy = RetryPolicy::new(2, 10);

        let response = fetch_with_retry(&client, url, &policy).await.unwrap();

        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn network_error_propagates_after_retries() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/data", addr)).unwrap();
        let client = Client::new();
        let policy = RetryPolicy::new(2, 20);

        let start = Instant::now();
        let result = fetch_with_retry(&client, url, &policy).await;

        assert!(result.is_err());
        // Two backoff sleeps (20ms + 40ms) were taken between the attempts
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
