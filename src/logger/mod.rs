//! Structured logging for Hashfolio
//!
//! Small tag + level logger with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output with timestamps
//!
//! ## Usage
//!
//! ```rust
//! use hashfolio::logger::{self, LogTag};
//!
//! logger::error(LogTag::Fetch, "Connection failed");
//! logger::warning(LogTag::Cache, "Serving stale entry");
//! logger::info(LogTag::System, "Server started");
//! logger::debug(LogTag::Fetch, "Request details: ..."); // Only if --debug-fetch
//! ```
//!
//! Call `logger::init()` once at startup (in main.rs) before any logging
//! occurs; it scans command-line arguments for verbosity and debug flags.

mod config;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system from command-line arguments
pub fn init() {
    config::init_from_args();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues, shown unless --quiet)
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics, gated by --debug-<module>)
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing, gated by --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Verbose, message);
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !config::should_log(&tag, level) {
        return;
    }

    format::format_and_log(tag, level, message);
}
