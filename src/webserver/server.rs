/// Axum webserver implementation
///
/// Main server lifecycle management including startup, shutdown, and graceful termination
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::{
    arguments,
    config::Config,
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// Global shutdown notifier
static SHUTDOWN_NOTIFY: once_cell::sync::Lazy<Arc<Notify>> =
    once_cell::sync::Lazy::new(|| Arc::new(Notify::new()));

/// Start the webserver
///
/// This function blocks until the server is shut down
pub async fn start_server(config: Config) -> Result<(), String> {
    let host = arguments::get_host_override().unwrap_or_else(|| config.server.host.clone());
    let port = arguments::get_port_override().unwrap_or(config.server.port);

    // Create application state (cache, HTTP clients, endpoint settings)
    let state = Arc::new(AppState::new(config)?);

    spawn_cache_sweeper(&state);

    // Build the router
    let app = build_app(state.clone());

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", host, port, e))?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        match e.kind() {
            std::io::ErrorKind::AddrInUse => {
                format!(
                    "Failed to bind to {}: address already in use\n\
                     Another hashfolio instance may be running; stop it or pass --port.",
                    addr
                )
            }
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Failed to bind to {}: permission denied\n\
                     Ports below 1024 require elevated privileges; pick a higher port.",
                    addr
                )
            }
            _ => format!("Failed to bind to {}: {}", addr, e),
        }
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("🌐 Listening on http://{}", addr),
    );
    logger::debug(
        LogTag::Webserver,
        &format!("📊 API endpoints available at http://{}/api", addr),
    );

    // Run the server with graceful shutdown
    let shutdown_signal = async {
        SHUTDOWN_NOTIFY.notified().await;
        logger::info(
            LogTag::Webserver,
            "Received shutdown signal, stopping webserver...",
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    logger::info(LogTag::Webserver, "✅ Webserver stopped gracefully");

    Ok(())
}

/// Trigger webserver shutdown
pub fn shutdown() {
    SHUTDOWN_NOTIFY.notify_one();
}

/// Build the Axum application with all routes and middleware
fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// Periodically drop cache entries expired beyond the grace window
///
/// Without the sweep the cache grows without bound over long uptimes; the
/// grace window keeps recently expired entries available for stale
/// fallback.
fn spawn_cache_sweeper(state: &Arc<AppState>) {
    let cache_config = state.config.cache.clone();
    if !cache_config.sweep_enabled {
        logger::debug(LogTag::Cache, "Cache sweep disabled by configuration");
        return;
    }

    let cache = state.cache.clone();
    let interval = Duration::from_secs(cache_config.sweep_interval_secs.max(1));
    let grace = Duration::from_secs(cache_config.sweep_grace_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.sweep(grace);
        }
    });
}
