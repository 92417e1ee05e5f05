/// Logger configuration and filtering rules
///
/// The configuration is derived once from command-line arguments at startup
/// and stored in a global so the logging functions stay allocation-free on
/// the filtered-out path.
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level threshold (messages above this are dropped)
    pub min_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> = Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

/// Initialize configuration from command-line arguments
///
/// --quiet lowers the threshold to warnings, --verbose raises it to full
/// trace output, and any --debug-* flag raises it enough for debug lines
/// (which are additionally gated per tag in should_log).
pub fn init_from_args() {
    let min_level = if arguments::is_quiet_enabled() {
        LogLevel::Warning
    } else if arguments::is_verbose_enabled() {
        LogLevel::Verbose
    } else if arguments::is_any_debug_enabled() {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    *LOGGER_CONFIG.write() = LoggerConfig { min_level };
}

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against the minimum level threshold
/// 3. Debug level additionally requires --debug-<module> for that tag
/// 4. Verbose level requires the --verbose flag
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    let config = get_logger_config();
    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return arguments::is_debug_enabled_for(tag.debug_key());
    }

    if level == LogLevel::Verbose {
        return arguments::is_verbose_enabled();
    }

    true
}
