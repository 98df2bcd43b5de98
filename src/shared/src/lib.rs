use serde::{Deserialize, Serialize};

/// Route of the price API pass-through
pub const PROXY_ROUTE: &str = "/api/coingecko";

/// Query parameter carrying the upstream path (with its own query string)
pub const ENDPOINT_QUERY_PARAM: &str = "endpoint";

pub const NO_ENDPOINT_MESSAGE: &str = "No endpoint specified";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from CoinGecko";

/// Body of every non-2xx proxy response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Builds the proxy URL that forwards `endpoint` (e.g. `/simple/price?ids=bitcoin&vs_currencies=usd`)
/// to the upstream API. The endpoint is percent-encoded so its own query string survives.
pub fn proxied_url(proxy_base: &str, endpoint: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(endpoint.as_bytes()).collect();

    format!(
        "{}{}?{}={}",
        proxy_base.trim_end_matches('/'),
        PROXY_ROUTE,
        ENDPOINT_QUERY_PARAM,
        encoded
    )
}
