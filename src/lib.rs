pub mod arguments;
pub mod cache;
pub mod config;
pub mod errors; // Structured error handling for the proxy core
pub mod fetch;
pub mod logger;
pub mod proxy;
pub mod upstream;
pub mod webserver;
