use std::fmt::{self, Display, Formatter};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use smallstr::SmallString;

pub type Price = Decimal;
pub type Amount = Decimal;

type String8 = SmallString<[u8; 8]>;
type String16 = SmallString<[u8; 16]>;

/// Price used whenever the feed has no usable USD price for an asset
pub const DEFAULT_PRICE: Price = dec!(1);

/// Stable asset key from the price feed (e.g. `bitcoin`, `choccyswap`)
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String16);

impl AssetId {
    /// Extracts a string slice containing the entire string.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for AssetId {
    #[inline]
    fn from(value: &str) -> Self {
        AssetId(String16::from_str(value))
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display ticker, always uppercased
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AssetSymbol(String8);

impl AssetSymbol {
    pub fn new(symbol: &str) -> Self {
        AssetSymbol(String8::from_str(&symbol.to_uppercase()))
    }

    /// Extracts a string slice containing the entire string.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for AssetSymbol {
    fn from(value: &str) -> Self {
        AssetSymbol::new(value)
    }
}

impl Display for AssetSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: AssetSymbol,
    pub name: String,
    pub price_usd: Price,
    pub contract_address: Option<String>,
    pub icon: Option<String>,
}

impl Asset {
    pub fn new(id: AssetId, symbol: AssetSymbol, name: impl Into<String>, price_usd: Price) -> Self {
        Self {
            id,
            symbol,
            name: name.into(),
            price_usd,
            contract_address: None,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_contract_address(mut self, contract_address: Option<String>) -> Self {
        self.contract_address = contract_address;
        self
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) ${}", self.symbol, self.name, self.price_usd)
    }
}

/// Raw feed price if it is finite, positive and representable
pub fn valid_feed_price(raw: Option<f64>) -> Option<Price> {
    raw.filter(|value| value.is_finite())
        .and_then(Decimal::from_f64)
        .filter(|price| *price > Decimal::ZERO)
}

/// Turns a raw feed price into a usable one. Missing, non-finite, non-positive
/// or unrepresentable values become `DEFAULT_PRICE`.
pub fn price_from_feed(raw: Option<f64>) -> Price {
    valid_feed_price(raw).unwrap_or(DEFAULT_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.017), dec!(0.017))]
    #[case(Some(43000.5), dec!(43000.5))]
    #[case(None, dec!(1))]
    #[case(Some(0.0), dec!(1))]
    #[case(Some(-3.0), dec!(1))]
    #[case(Some(f64::NAN), dec!(1))]
    #[case(Some(f64::INFINITY), dec!(1))]
    #[case(Some(1e40), dec!(1))]
    fn feed_price_defaulting(#[case] raw: Option<f64>, #[case] expected: Price) {
        assert_eq!(price_from_feed(raw), expected);
    }

    #[test]
    fn symbol_is_uppercased() {
        let asset = Asset::new("ethereum".into(), "eth".into(), "Ethereum", dec!(2000));

        assert_eq!(asset.symbol.as_str(), "ETH");
        assert_eq!(asset.to_string(), "ETH (Ethereum) $2000");
    }

    #[test]
    fn long_ids_are_kept_whole() {
        let id = AssetId::from("wrapped-staked-ether-on-some-chain");

        assert_eq!(id.as_str(), "wrapped-staked-ether-on-some-chain");
    }
}
