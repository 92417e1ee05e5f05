use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::webserver::state::AppState;

pub mod market;
pub mod mining;
pub mod status;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(status::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(status::ping))
        .merge(market::routes())
        .merge(mining::routes())
}
