use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::responses::{CoinListEntry, MarketCoin, SimplePrices, TrendingResponse};
use crate::core::assets::asset::AssetId;

/// Read access to the public price API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// `/simple/price` for `ids` quoted in `vs_currency`
    async fn simple_prices(&self, ids: &[AssetId], vs_currency: &str) -> Result<SimplePrices>;

    /// `/coins/markets` ordered by market cap
    async fn top_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<MarketCoin>>;

    async fn trending(&self) -> Result<TrendingResponse>;

    /// `/coins/list` with platform contract addresses
    async fn coin_list_with_platforms(&self) -> Result<Vec<CoinListEntry>>;
}
