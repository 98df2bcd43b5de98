use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::assets::asset::{AssetId, Price};

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub proxy: ProxySettings,
    pub price_feed: PriceFeedSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub address: String,
    pub upstream_base_url: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_owned(),
            upstream_base_url: COINGECKO_BASE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedSettings {
    pub base_url: String,
    /// When set, every feed request goes through this proxy instead of `base_url`
    pub proxy_url: Option<String>,
    pub vs_currency: String,
    pub top_markets_per_page: u32,
    pub top_markets_page: u32,
    pub resolve_contract_addresses: bool,
}

impl Default for PriceFeedSettings {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_BASE_URL.to_owned(),
            proxy_url: None,
            vs_currency: "usd".to_owned(),
            top_markets_per_page: 30,
            top_markets_page: 1,
            resolve_contract_addresses: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAssetSettings {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    /// Placeholder price used when the feed can't be reached
    #[serde(default)]
    pub fallback_price: Option<Price>,
}

impl StaticAssetSettings {
    pub fn new(id: &str, symbol: &str, name: &str, fallback_price: Option<Price>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            fallback_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub default_destination: AssetId,
    pub initial_amount: String,
    /// Asset ids treated as fiat in the trending variant, USD first
    pub usd_id: AssetId,
    pub eur_id: AssetId,
    /// USD-pegged coin whose EUR quote gives the EUR rate
    pub eur_rate_reference: AssetId,
    pub btc_id: AssetId,
    pub in_house: StaticAssetSettings,
    pub static_assets: Vec<StaticAssetSettings>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            default_destination: "usd".into(),
            initial_amount: "1000.00".to_owned(),
            usd_id: "usd".into(),
            eur_id: "eur".into(),
            eur_rate_reference: "tether".into(),
            btc_id: "bitcoin".into(),
            in_house: StaticAssetSettings::new("choccyswap", "CCY", "ChoccySwap", None),
            static_assets: vec![
                StaticAssetSettings::new("usd", "USD", "US Dollar", None),
                StaticAssetSettings::new("eur", "EUR", "Euro", None),
                StaticAssetSettings::new("ethereum", "ETH", "Ethereum", Some(dec!(2000))),
                StaticAssetSettings::new("bitcoin", "BTC", "Bitcoin", None),
            ],
        }
    }
}
