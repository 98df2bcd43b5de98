use itertools::Itertools;

use crate::core::assets::asset::{
    price_from_feed, Asset, AssetId, AssetSymbol, Price, DEFAULT_PRICE,
};
use crate::core::settings::{AssetSettings, StaticAssetSettings};

/// Assets offered for conversion. Ids are unique and the in-house token comes first
/// whenever the list is built from settings. Replaced as a whole, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetList {
    assets: Vec<Asset>,
}

impl AssetList {
    /// Fixed entries first in their order, then fetched entries with ids the fixed list
    /// doesn't have. The first occurrence of a repeated id wins.
    pub fn merge(fixed: Vec<Asset>, fetched: Vec<Asset>) -> Self {
        let assets = fixed
            .into_iter()
            .chain(fetched)
            .unique_by(|asset| asset.id.clone())
            .collect_vec();

        Self { assets }
    }

    /// In-house token and static assets priced by `price_of`
    pub fn fixed(settings: &AssetSettings, price_of: impl Fn(&AssetId) -> Option<f64>) -> Self {
        let assets = fixed_asset_settings(settings)
            .map(|x| static_asset(x, price_from_feed(price_of(&x.id))))
            .collect_vec();

        Self::merge(assets, Vec::new())
    }

    /// Fixed assets with their placeholder prices, used when the feed is unavailable
    pub fn fallback(settings: &AssetSettings) -> Self {
        let assets = fixed_asset_settings(settings)
            .map(|x| static_asset(x, x.fallback_price.unwrap_or(DEFAULT_PRICE)))
            .collect_vec();

        Self::merge(assets, Vec::new())
    }

    pub fn find(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }

    pub fn first(&self) -> Option<&Asset> {
        self.assets.first()
    }

    pub fn get(&self, index: usize) -> Option<&Asset> {
        self.assets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Case-insensitive substring match on symbol or name, list order kept
    pub fn search(&self, term: &str) -> Vec<&Asset> {
        let term = term.to_lowercase();

        self.assets
            .iter()
            .filter(|asset| {
                asset.symbol.as_str().to_lowercase().contains(&term)
                    || asset.name.to_lowercase().contains(&term)
            })
            .collect_vec()
    }

    pub fn into_vec(self) -> Vec<Asset> {
        self.assets
    }
}

fn fixed_asset_settings(settings: &AssetSettings) -> impl Iterator<Item = &StaticAssetSettings> {
    std::iter::once(&settings.in_house).chain(
        settings
            .static_assets
            .iter()
            .filter(move |x| x.id != settings.in_house.id),
    )
}

fn static_asset(settings: &StaticAssetSettings, price: Price) -> Asset {
    Asset::new(
        settings.id.clone(),
        AssetSymbol::new(&settings.symbol),
        settings.name.clone(),
        price,
    )
}
