//! Wire shapes of the CoinGecko endpoints. Fields the feed may omit are optional here
//! and defaulted when converted into [`Asset`]s.

use std::collections::HashMap;

use serde::Deserialize;

use crate::core::assets::asset::{
    price_from_feed, valid_feed_price, Asset, AssetId, AssetSymbol, Price, DEFAULT_PRICE,
};

/// `/simple/price`: id -> currency -> price
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SimplePrices(HashMap<String, HashMap<String, Option<f64>>>);

impl SimplePrices {
    pub fn price(&self, id: &AssetId, vs_currency: &str) -> Option<f64> {
        self.0.get(id.as_str())?.get(vs_currency).copied().flatten()
    }
}

impl From<HashMap<String, HashMap<String, Option<f64>>>> for SimplePrices {
    fn from(value: HashMap<String, HashMap<String, Option<f64>>>) -> Self {
        SimplePrices(value)
    }
}

/// Entry of `/coins/markets`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl MarketCoin {
    pub fn to_asset(&self) -> Asset {
        Asset::new(
            self.id.as_str().into(),
            AssetSymbol::new(&self.symbol),
            self.name.clone(),
            price_from_feed(self.current_price),
        )
        .with_icon(self.image.clone())
    }
}

/// `/search/trending`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingCoin>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendingCoin {
    pub item: TrendingItem,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendingItem {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub price_btc: Option<f64>,
    #[serde(default)]
    pub large: Option<String>,
}

impl TrendingItem {
    /// Trending coins are quoted in BTC only, `btc_usd` rebases them to USD.
    /// Without a usable BTC quote the coin gets the default USD price.
    pub fn to_asset(&self, btc_usd: Price) -> Asset {
        let price_usd = valid_feed_price(self.price_btc)
            .and_then(|price_btc| price_btc.checked_mul(btc_usd))
            .filter(|price| !price.is_zero())
            .unwrap_or(DEFAULT_PRICE);

        Asset::new(
            self.id.as_str().into(),
            AssetSymbol::new(&self.symbol),
            self.name.clone(),
            price_usd,
        )
        .with_icon(self.large.clone())
    }
}

/// Entry of `/coins/list?include_platform=true`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    #[serde(default)]
    pub platforms: HashMap<String, Option<String>>,
}

pub const ETHEREUM_PLATFORM: &str = "ethereum";

impl CoinListEntry {
    pub fn ethereum_address(&self) -> Option<&str> {
        self.platforms
            .get(ETHEREUM_PLATFORM)?
            .as_deref()
            .filter(|address| !address.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn simple_prices_lookup() {
        let prices: SimplePrices = serde_json::from_str(
            r#"{"choccyswap":{"usd":0.017},"ethereum":{"usd":3100.5},"eur":{},"usd":{"usd":null}}"#,
        )
        .expect("in test");

        assert_eq!(prices.price(&"choccyswap".into(), "usd"), Some(0.017));
        assert_eq!(prices.price(&"ethereum".into(), "usd"), Some(3100.5));
        assert_eq!(prices.price(&"eur".into(), "usd"), None);
        assert_eq!(prices.price(&"usd".into(), "usd"), None);
        assert_eq!(prices.price(&"bitcoin".into(), "usd"), None);
    }

    #[test]
    fn market_coin_defaults_missing_price() {
        let coins: Vec<MarketCoin> = serde_json::from_str(
            r#"[
                {"id":"bitcoin","name":"Bitcoin","symbol":"btc","current_price":61000.25,"image":"https://coin-images.coingecko.com/btc.png","market_cap":1},
                {"id":"obscure","name":"Obscure","symbol":"obs","current_price":null}
            ]"#,
        )
        .expect("in test");

        let bitcoin = coins[0].to_asset();
        assert_eq!(bitcoin.symbol.as_str(), "BTC");
        assert_eq!(bitcoin.price_usd, dec!(61000.25));
        assert_eq!(
            bitcoin.icon.as_deref(),
            Some("https://coin-images.coingecko.com/btc.png")
        );

        let obscure = coins[1].to_asset();
        assert_eq!(obscure.price_usd, dec!(1));
        assert_eq!(obscure.icon, None);
    }

    #[test]
    fn trending_item_is_rebased_to_usd() {
        let trending: TrendingResponse = serde_json::from_str(
            r#"{"coins":[{"item":{"id":"pepe","name":"Pepe","symbol":"pepe","price_btc":0.00048828125,"score":0}}],"nfts":[]}"#,
        )
        .expect("in test");

        let pepe = trending.coins[0].item.to_asset(dec!(64000));
        assert_eq!(pepe.symbol.as_str(), "PEPE");
        assert_eq!(pepe.price_usd, dec!(31.25));
    }

    #[test]
    fn trending_item_without_btc_quote_gets_default_usd_price() {
        let trending: TrendingResponse = serde_json::from_str(
            r#"{"coins":[
                {"item":{"id":"fresh","name":"Fresh","symbol":"frsh"}},
                {"item":{"id":"nulled","name":"Nulled","symbol":"nul","price_btc":null}},
                {"item":{"id":"dust","name":"Dust","symbol":"dst","price_btc":0}}
            ]}"#,
        )
        .expect("in test");

        for coin in &trending.coins {
            assert_eq!(coin.item.to_asset(dec!(64000)).price_usd, DEFAULT_PRICE);
        }
    }

    #[test]
    fn ethereum_address_from_platforms() {
        let entries: Vec<CoinListEntry> = serde_json::from_str(
            r#"[
                {"id":"chainlink","symbol":"link","name":"Chainlink","platforms":{"ethereum":"0x514910771af9ca656af840dff83e8264ecf986ca","":""}},
                {"id":"bitcoin","symbol":"btc","name":"Bitcoin","platforms":{}},
                {"id":"weird","symbol":"w","name":"Weird","platforms":{"ethereum":null}}
            ]"#,
        )
        .expect("in test");

        assert_eq!(
            entries[0].ethereum_address(),
            Some("0x514910771af9ca656af840dff83e8264ecf986ca")
        );
        assert_eq!(entries[1].ethereum_address(), None);
        assert_eq!(entries[2].ethereum_address(), None);
    }
}
