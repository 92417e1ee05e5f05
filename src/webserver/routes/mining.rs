/// Mining pool statistics proxy route
///
/// The provider's schema is unofficial and shifts between coins; responses
/// are passed through verbatim and only summarized (loosely parsed) for
/// debug logging.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::logger::{self, LogTag};
use crate::proxy::{proxy_json, ProxyOutcome, ServeSource};
use crate::upstream::mining::{self, MiningCoinData};
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, proxy_response, required};

const UPSTREAM_LABEL: &str = "Mining stats";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/mining/coin/:slug", get(mining_coin))
}

/// GET /api/mining/coin/:slug - per-coin network and pool statistics
async fn mining_coin(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let slug = match required(Some(slug.as_str()), "slug") {
        Ok(slug) => slug,
        Err(response) => return response,
    };

    let params = [("slug", slug.clone())];
    let url = match mining::coin_url(&state.config.mining.base_url, &slug) {
        Ok(url) => url,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid upstream configuration",
                Some(e.to_string()),
            )
        }
    };

    let outcome = proxy_json(
        &state.mining_http,
        &state.cache,
        &state.endpoints.mining,
        url,
        &params,
    )
    .await;

    if let ProxyOutcome::Payload {
        body,
        source: ServeSource::Fresh,
        ..
    } = &outcome
    {
        // Best-effort summary; the loose schema makes parse failures normal
        if let Ok(data) = serde_json::from_value::<MiningCoinData>(body.clone()) {
            logger::debug(
                LogTag::Mining,
                &format!(
                    "{}: {} pools listed, network hashrate {}",
                    slug,
                    data.pool_count(),
                    data.network_hashrate
                        .map(|h| format!("{:.3e} H/s", h))
                        .unwrap_or_else(|| "unreported".to_string()),
                ),
            );
        }
    }

    proxy_response(outcome, UPSTREAM_LABEL)
}
