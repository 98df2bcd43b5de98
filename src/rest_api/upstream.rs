use anyhow::{Context, Result};
use async_trait::async_trait;
use hyper::Uri;

use crate::core::rest_client::{build_uri, HttpParams, RestClient, RestRequestOutcome};

/// Source the proxy forwards requests to
#[async_trait]
pub trait Upstream: Send + Sync {
    /// `endpoint` is an upstream path with its query string
    async fn get(&self, endpoint: &str) -> Result<RestRequestOutcome>;
}

pub struct CoinGeckoUpstream {
    rest_client: RestClient,
    base_url: String,
}

impl CoinGeckoUpstream {
    pub fn new(base_url: &str) -> Self {
        Self {
            rest_client: RestClient::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn url_for(&self, endpoint: &str) -> Result<Uri> {
        build_uri(&self.base_url, endpoint, &HttpParams::new())
            .with_context(|| format!("Unable create upstream url for endpoint {}", endpoint))
    }
}

#[async_trait]
impl Upstream for CoinGeckoUpstream {
    async fn get(&self, endpoint: &str) -> Result<RestRequestOutcome> {
        let url = self.url_for(endpoint)?;
        self.rest_client.get(url).await
    }
}
