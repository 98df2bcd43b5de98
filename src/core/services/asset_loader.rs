use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use itertools::Itertools;
use rust_decimal::Decimal;

use crate::core::assets::asset::{
    price_from_feed, Asset, AssetId, AssetSymbol, Price, DEFAULT_PRICE,
};
use crate::core::assets::asset_list::AssetList;
use crate::core::services::price_feed::price_feed::PriceFeed;
use crate::core::settings::{AssetSettings, PriceFeedSettings};

pub const LOAD_FAILED_WARNING: &str = "Failed to fetch token data. Using default values.";

const EUR: &str = "eur";

/// Result of a load: always a usable list, plus a warning when defaults were substituted
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAssets {
    pub assets: AssetList,
    pub warning: Option<String>,
}

impl LoadedAssets {
    pub fn loaded(assets: AssetList) -> Self {
        Self {
            assets,
            warning: None,
        }
    }

    pub fn fallback(settings: &AssetSettings) -> Self {
        Self {
            assets: AssetList::fallback(settings),
            warning: Some(LOAD_FAILED_WARNING.to_owned()),
        }
    }
}

pub struct AssetLoader {
    price_feed: Arc<dyn PriceFeed>,
    feed_settings: PriceFeedSettings,
    asset_settings: AssetSettings,
}

impl AssetLoader {
    pub fn new(
        price_feed: Arc<dyn PriceFeed>,
        feed_settings: PriceFeedSettings,
        asset_settings: AssetSettings,
    ) -> Self {
        Self {
            price_feed,
            feed_settings,
            asset_settings,
        }
    }

    /// In-house and static assets followed by the top market cap page
    pub async fn load_top_market_assets(&self) -> LoadedAssets {
        match self.try_load_top_market_assets().await {
            Ok(assets) => {
                log::info!("Loaded {} assets from top markets", assets.len());
                LoadedAssets::loaded(assets)
            }
            Err(error) => {
                log::error!("Error fetching top market assets: {:?}", error);
                LoadedAssets::fallback(&self.asset_settings)
            }
        }
    }

    /// In-house token, USD and EUR, then the currently trending coins
    pub async fn load_trending_assets(&self) -> LoadedAssets {
        match self.try_load_trending_assets().await {
            Ok(assets) => {
                log::info!("Loaded {} assets from trending coins", assets.len());
                LoadedAssets::loaded(assets)
            }
            Err(error) => {
                log::error!("Error fetching trending assets: {:?}", error);
                LoadedAssets::fallback(&self.asset_settings)
            }
        }
    }

    /// USD value of one EUR, derived from the EUR quote of a USD-pegged coin
    pub async fn fetch_eur_rate(&self) -> Result<Price> {
        let reference = &self.asset_settings.eur_rate_reference;
        let prices = self
            .price_feed
            .simple_prices(std::slice::from_ref(reference), EUR)
            .await?;

        let eur_per_usd = prices
            .price(reference, EUR)
            .with_context(|| format!("No EUR quote for {}", reference))?;

        let eur_per_usd = price_from_feed(Some(eur_per_usd));
        Decimal::ONE
            .checked_div(eur_per_usd)
            .with_context(|| format!("Invalid EUR quote {} for {}", eur_per_usd, reference))
    }

    async fn try_load_top_market_assets(&self) -> Result<AssetList> {
        let vs_currency = self.feed_settings.vs_currency.as_str();
        let fixed_ids = self.fixed_ids();

        let (top_markets, fixed_prices) = futures::try_join!(
            self.price_feed.top_markets(
                vs_currency,
                self.feed_settings.top_markets_per_page,
                self.feed_settings.top_markets_page,
            ),
            self.price_feed.simple_prices(&fixed_ids, vs_currency),
        )?;

        let fixed = AssetList::fixed(&self.asset_settings, |id| {
            fixed_prices.price(id, vs_currency)
        });
        let fetched = top_markets.iter().map(|coin| coin.to_asset()).collect_vec();

        let assets = AssetList::merge(fixed.into_vec(), fetched);
        Ok(self.with_contract_addresses(assets).await)
    }

    async fn try_load_trending_assets(&self) -> Result<AssetList> {
        let settings = &self.asset_settings;
        let vs_currency = self.feed_settings.vs_currency.as_str();
        let priced_ids = [settings.in_house.id.clone(), settings.btc_id.clone()];

        let (trending, prices, eur_rate) = futures::join!(
            self.price_feed.trending(),
            self.price_feed.simple_prices(&priced_ids, vs_currency),
            self.fetch_eur_rate(),
        );
        let trending = trending.context("Unable to fetch trending coins")?;
        let prices = prices.context("Unable to fetch in-house and BTC prices")?;

        let in_house_price = prices
            .price(&settings.in_house.id, vs_currency)
            .with_context(|| format!("No price for {}", settings.in_house.id))?;
        let btc_usd = prices
            .price(&settings.btc_id, vs_currency)
            .with_context(|| format!("No price for {}", settings.btc_id))?;
        let btc_usd = price_from_feed(Some(btc_usd));

        let eur_rate = eur_rate.unwrap_or_else(|error| {
            log::warn!("Error fetching EUR rate, EUR keeps default price: {:?}", error);
            DEFAULT_PRICE
        });

        let mut fixed = vec![Asset::new(
            settings.in_house.id.clone(),
            AssetSymbol::new(&settings.in_house.symbol),
            settings.in_house.name.clone(),
            price_from_feed(Some(in_house_price)),
        )];
        fixed.extend(self.fiat_asset(&settings.usd_id, Decimal::ONE));
        fixed.extend(self.fiat_asset(&settings.eur_id, eur_rate));

        let fetched = trending
            .coins
            .iter()
            .map(|coin| coin.item.to_asset(btc_usd))
            .collect_vec();

        let assets = AssetList::merge(fixed, fetched);
        Ok(self.with_contract_addresses(assets).await)
    }

    fn fixed_ids(&self) -> Vec<AssetId> {
        AssetList::fallback(&self.asset_settings)
            .iter()
            .map(|asset| asset.id.clone())
            .collect_vec()
    }

    fn fiat_asset(&self, id: &AssetId, price: Price) -> Option<Asset> {
        let fiat = self
            .asset_settings
            .static_assets
            .iter()
            .find(|x| &x.id == id)?;

        Some(Asset::new(
            fiat.id.clone(),
            AssetSymbol::new(&fiat.symbol),
            fiat.name.clone(),
            price,
        ))
    }

    /// Contract addresses are optional decoration, a failure here never fails the load
    async fn with_contract_addresses(&self, assets: AssetList) -> AssetList {
        if !self.feed_settings.resolve_contract_addresses {
            return assets;
        }

        let coin_list = match self.price_feed.coin_list_with_platforms().await {
            Ok(coin_list) => coin_list,
            Err(error) => {
                log::warn!("Unable to resolve contract addresses: {:?}", error);
                return assets;
            }
        };

        let addresses: HashMap<&str, &str> = coin_list
            .iter()
            .filter_map(|entry| Some((entry.id.as_str(), entry.ethereum_address()?)))
            .collect();

        let assets = assets
            .into_vec()
            .into_iter()
            .map(|asset| {
                let address = addresses.get(asset.id.as_str()).map(|x| (*x).to_owned());
                asset.with_contract_address(address)
            })
            .collect_vec();

        AssetList::merge(assets, Vec::new())
    }
}
