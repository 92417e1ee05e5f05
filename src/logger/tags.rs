/// Log tags identifying the originating module
///
/// Every log line carries a tag so output can be filtered per module via
/// --debug-<module> flags. The debug key is the lowercase flag suffix.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Webserver,
    Cache,
    Fetch,
    Market,
    Mining,
}

impl LogTag {
    /// Display name used in formatted log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Webserver => "WEBSERVER",
            LogTag::Cache => "CACHE",
            LogTag::Fetch => "FETCH",
            LogTag::Market => "MARKET",
            LogTag::Mining => "MINING",
        }
    }

    /// Key used for --debug-<key> command-line flags
    pub fn debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Webserver => "webserver",
            LogTag::Cache => "cache",
            LogTag::Fetch => "fetch",
            LogTag::Market => "market",
            LogTag::Mining => "mining",
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
