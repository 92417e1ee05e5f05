use hashfolio::{
    arguments,
    config::Config,
    logger::{self, LogTag},
    webserver,
};

/// Main entry point for Hashfolio
///
/// Loads configuration, starts the proxy webserver and keeps running until
/// Ctrl-C triggers a graceful shutdown.
#[tokio::main]
async fn main() {
    // Initialize logger system (scans argv for verbosity/debug flags)
    logger::init();

    // Check for help request first (before any other processing)
    if arguments::is_help_requested() {
        arguments::print_help();
        return;
    }

    logger::info(LogTag::System, "🚀 Hashfolio proxy starting up...");

    let config = Config::load();

    if let Err(e) = ctrlc::set_handler(|| {
        webserver::shutdown();
    }) {
        logger::warning(
            LogTag::System,
            &format!("⚠️ Could not install Ctrl-C handler: {}", e),
        );
    }

    if let Err(e) = webserver::start_server(config).await {
        logger::error(LogTag::System, &format!("❌ {}", e));
        std::process::exit(1);
    }

    logger::info(LogTag::System, "👋 Shutdown complete");
}
