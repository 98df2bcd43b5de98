use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use hyper::Uri;
use itertools::Itertools;
use serde::de::DeserializeOwned;

use super::price_feed::PriceFeed;
use super::responses::{CoinListEntry, MarketCoin, SimplePrices, TrendingResponse};
use crate::core::assets::asset::AssetId;
use crate::core::rest_client::{to_http_string, HttpParams, RestClient};
use crate::core::settings::PriceFeedSettings;

/// Where feed requests are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRoute {
    /// Straight to the API, `base_url` + endpoint
    Direct { base_url: String },
    /// Through the pass-through route of the proxy server
    Proxy { proxy_url: String },
}

impl FeedRoute {
    pub fn from_settings(settings: &PriceFeedSettings) -> Self {
        match &settings.proxy_url {
            Some(proxy_url) => FeedRoute::Proxy {
                proxy_url: proxy_url.clone(),
            },
            None => FeedRoute::Direct {
                base_url: settings.base_url.clone(),
            },
        }
    }

    /// `endpoint` is the upstream path with its query string
    pub fn url_for(&self, endpoint: &str) -> Result<Uri> {
        let url = match self {
            FeedRoute::Direct { base_url } => {
                format!("{}{}", base_url.trim_end_matches('/'), endpoint)
            }
            FeedRoute::Proxy { proxy_url } => shared::proxied_url(proxy_url, endpoint),
        };

        url.try_into()
            .with_context(|| format!("Unable create url for endpoint {}", endpoint))
    }
}

pub struct CoinGeckoPriceFeed {
    rest_client: RestClient,
    route: FeedRoute,
}

impl CoinGeckoPriceFeed {
    pub fn new(route: FeedRoute) -> Self {
        Self {
            rest_client: RestClient::new(),
            route,
        }
    }

    pub fn from_settings(settings: &PriceFeedSettings) -> Self {
        Self::new(FeedRoute::from_settings(settings))
    }

    async fn request<T: DeserializeOwned>(&self, path: &str, params: &HttpParams) -> Result<T> {
        let endpoint = if params.is_empty() {
            path.to_owned()
        } else {
            format!("{}?{}", path, to_http_string(params))
        };

        let url = self.route.url_for(&endpoint)?;
        let outcome = self.rest_client.get(url).await?;

        if !outcome.status.is_success() {
            bail!(
                "Price feed responded with status {} for {}: {}",
                outcome.status,
                endpoint,
                outcome.content
            );
        }

        serde_json::from_str(&outcome.content)
            .with_context(|| format!("Unable to parse response for {}", endpoint))
    }
}

fn params(pairs: &[(&str, String)]) -> HttpParams {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect_vec()
}

#[async_trait]
impl PriceFeed for CoinGeckoPriceFeed {
    async fn simple_prices(&self, ids: &[AssetId], vs_currency: &str) -> Result<SimplePrices> {
        let ids = ids.iter().map(|id| id.as_str()).join(",");

        self.request(
            "/simple/price",
            &params(&[("ids", ids), ("vs_currencies", vs_currency.to_owned())]),
        )
        .await
    }

    async fn top_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<MarketCoin>> {
        self.request(
            "/coins/markets",
            &params(&[
                ("vs_currency", vs_currency.to_owned()),
                ("order", "market_cap_desc".to_owned()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
                ("sparkline", "false".to_owned()),
            ]),
        )
        .await
    }

    async fn trending(&self) -> Result<TrendingResponse> {
        self.request("/search/trending", &HttpParams::new()).await
    }

    async fn coin_list_with_platforms(&self) -> Result<Vec<CoinListEntry>> {
        self.request(
            "/coins/list",
            &params(&[("include_platform", "true".to_owned())]),
        )
        .await
    }
}
