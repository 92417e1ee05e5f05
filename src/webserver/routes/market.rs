/// Market data proxy routes
///
/// Thin translation layer: validate input, normalize parameters, then hand
/// the request to the shared proxy flow. Upstream payloads are passed
/// through verbatim.
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

use crate::logger::{self, LogTag};
use crate::proxy::{proxy_json, ProxyOutcome, ServeSource};
use crate::upstream::market;
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, proxy_response, required};

const UPSTREAM_LABEL: &str = "Market data";

#[derive(Debug, Deserialize)]
pub struct MarketsQuery {
    ids: Option<String>,
    vs_currency: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    ids: Option<String>,
    vs_currencies: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/coins", get(coin_markets))
        .route("/market/price", get(simple_price))
}

/// GET /api/market/coins - market listing for a set of coin ids
async fn coin_markets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarketsQuery>,
) -> Response {
    let ids = match required(query.ids.as_deref(), "ids") {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    let vs_currency = query.vs_currency.as_deref().unwrap_or("usd").to_lowercase();
    let per_page = query.per_page.unwrap_or(market::MAX_PER_PAGE);
    let page = query.page.unwrap_or(1);

    let params = market::markets_params(&ids, &vs_currency, per_page, page);
    let url = match market::markets_url(&state.config.market.base_url, &params) {
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
        &state.market_http,
        &state.cache,
        &state.endpoints.markets,
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
        if let Some(rows) = body.as_array() {
            logger::debug(LogTag::Market, &format!("Listing returned {} rows", rows.len()));
        }
    }

    proxy_response(outcome, UPSTREAM_LABEL)
}

/// GET /api/market/price - quick spot price lookup
async fn simple_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Response {
    let ids = match required(query.ids.as_deref(), "ids") {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    let vs_currencies = query
        .vs_currencies
        .as_deref()
        .unwrap_or("usd")
        .to_lowercase();

    let params = market::price_params(&ids, &vs_currencies);
    let url = match market::price_url(&state.config.market.base_url, &params) {
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
        &state.market_http,
        &state.cache,
        &state.endpoints.price,
        url,
        &params,
    )
    .await;

    proxy_response(outcome, UPSTREAM_LABEL)
}
