/// Structured error handling for the proxy core
///
/// Covers the failure modes of one proxied request that are detected before
/// the upstream is contacted: rejected client input and unusable upstream
/// configuration. Upstream HTTP *status* errors are not represented here;
/// those responses are passed through to the caller verbatim, and transport
/// failures surface as `reqwest::Error` at the fetch layer.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing required parameter `{0}`")]
    MissingParam(&'static str),

    #[error("invalid upstream base URL `{0}`")]
    BadBaseUrl(String),

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ProxyError {
    /// Whether the error is the caller's fault (maps to a 400 response)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ProxyError::MissingParam(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_param_is_client_error() {
        let err = ProxyError::MissingParam("ids");
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "missing required parameter `ids`");
    }

    #[test]
    fn bad_base_url_is_not_client_error() {
        assert!(!ProxyError::BadBaseUrl("::".to_string()).is_client_error());
    }
}
