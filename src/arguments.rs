/// Centralized argument handling for Hashfolio
///
/// Consolidates command-line argument parsing and debug flag checking so that
/// modules can query flags without re-reading std::env themselves.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for all modules
/// - Value extraction for flags that take a parameter (--port 9090)
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
/// Returns a vector clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// FLAG CHECKING FUNCTIONS
// =============================================================================

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

/// Checks for a per-module debug flag (--debug-cache, --debug-fetch, ...)
/// --debug-all enables debug output for every module at once
pub fn is_debug_enabled_for(module: &str) -> bool {
    has_arg(&format!("--debug-{}", module)) || has_arg("--debug-all")
}

pub fn is_any_debug_enabled() -> bool {
    get_cmd_args().iter().any(|a| a.starts_with("--debug-"))
}

// =============================================================================
// VALUE FLAGS
// =============================================================================

/// Listen port override (--port 9090), takes precedence over the config file
pub fn get_port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|v| v.parse().ok())
}

/// Bind host override (--host 0.0.0.0)
pub fn get_host_override() -> Option<String> {
    get_arg_value("--host")
}

/// Explicit configuration file path (--config path/to/file.toml)
pub fn get_config_path() -> Option<String> {
    get_arg_value("--config")
}

/// Print usage information for the binary
pub fn print_help() {
    println!("hashfolio - mining portfolio API proxy");
    println!();
    println!("USAGE:");
    println!("    hashfolio [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --host <addr>        Bind address (default 127.0.0.1)");
    println!("    --port <port>        Listen port (default 8080)");
    println!("    --config <path>      Configuration file (default hashfolio.toml)");
    println!("    --quiet              Only show warnings and errors");
    println!("    --verbose            Show verbose trace output");
    println!("    --debug-<module>     Debug output for one module");
    println!("                         (system, config, webserver, cache, fetch, market, mining)");
    println!("    --debug-all          Debug output for every module");
    println!("    -h, --help           Show this help text");
}
