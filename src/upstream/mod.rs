/// Upstream endpoint definitions
///
/// URL construction for the two third-party providers the service proxies.
/// Base URLs come from configuration so tests (and self-hosted mirrors) can
/// point the service at a different origin.
pub mod market;
pub mod mining;

use url::Url;

use crate::errors::ProxyError;

/// Build an upstream URL from a base, extra path segments and query pairs
///
/// Path segments are appended with percent-encoding, so caller-supplied
/// identifiers (coin slugs) cannot break out of the path.
pub fn endpoint_url(
    base: &str,
    segments: &[&str],
    params: &[(&'static str, String)],
) -> Result<Url, ProxyError> {
    let mut url = Url::parse(base.trim_end_matches('/'))?;

    url.path_segments_mut()
        .map_err(|_| ProxyError::BadBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);

    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_with_segments_and_query() {
        let url = endpoint_url(
            "https://api.example.com/api/v3",
            &["coins", "markets"],
            &[("ids", "bitcoin".to_string()), ("page", "1".to_string())],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v3/coins/markets?ids=bitcoin&page=1"
        );
    }

    #[test]
    fn tolerates_trailing_slash_on_base() {
        let url = endpoint_url("https://api.example.com/api/v3/", &["simple", "price"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v3/simple/price");
    }

    #[test]
    fn percent_encodes_path_segments() {
        let url = endpoint_url("https://stats.example.com", &["api", "coin", "ethereum classic"], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://stats.example.com/api/coin/ethereum%20classic"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(endpoint_url("not a url", &["x"], &[]).is_err());
    }
}
