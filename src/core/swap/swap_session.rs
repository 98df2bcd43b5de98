use thiserror::Error;

use crate::core::assets::asset::{Asset, AssetId};
use crate::core::assets::asset_list::AssetList;
use crate::core::services::asset_loader::LoadedAssets;
use crate::core::services::usd_converter::usd_converter::{convert, ConversionError};
use crate::core::settings::AssetSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("asset `{0}` isn't in the asset list")]
    UnknownAsset(AssetId),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Token picker opened for one side, filtered by a search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPicker {
    pub side: Side,
    pub search_term: String,
}

/// State of one conversion pair. The amount opposite to the last edit is derived.
#[derive(Debug, Clone)]
pub struct SwapSession {
    assets: AssetList,
    top: Option<Asset>,
    bottom: Option<Asset>,
    top_amount: String,
    bottom_amount: String,
    warning: Option<String>,
    picker: Option<TokenPicker>,
    in_house_id: AssetId,
    default_destination: AssetId,
}

impl SwapSession {
    pub fn new(settings: &AssetSettings) -> Self {
        Self {
            assets: AssetList::default(),
            top: None,
            bottom: None,
            top_amount: settings.initial_amount.clone(),
            bottom_amount: "0".to_owned(),
            warning: None,
            picker: None,
            in_house_id: settings.in_house.id.clone(),
            default_destination: settings.default_destination.clone(),
        }
    }

    /// Replaces the asset list, selects the in-house token against the default destination
    pub fn load(&mut self, loaded: LoadedAssets) -> Result<(), SwapError> {
        let LoadedAssets { assets, warning } = loaded;

        self.top = assets
            .find(&self.in_house_id)
            .or_else(|| assets.get(0))
            .cloned();
        self.bottom = assets
            .find(&self.default_destination)
            .or_else(|| assets.get(1))
            .cloned();
        self.assets = assets;
        self.warning = warning;

        self.recompute_bottom()
    }

    pub fn set_top_amount(&mut self, text: &str) -> Result<(), SwapError> {
        self.top_amount = text.to_owned();
        self.recompute_bottom()
    }

    pub fn set_bottom_amount(&mut self, text: &str) -> Result<(), SwapError> {
        self.bottom_amount = text.to_owned();
        self.recompute_top()
    }

    pub fn open_picker(&mut self, side: Side) {
        self.picker = Some(TokenPicker {
            side,
            search_term: String::new(),
        });
    }

    pub fn set_search_term(&mut self, term: &str) {
        if let Some(picker) = &mut self.picker {
            picker.search_term = term.to_owned();
        }
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Assets matching the picker's search term, all assets when no picker is open
    pub fn visible_assets(&self) -> Vec<&Asset> {
        let term = self
            .picker
            .as_ref()
            .map(|picker| picker.search_term.as_str())
            .unwrap_or_default();

        self.assets.search(term)
    }

    /// Selects `id` on the picker's side (bottom when none is open). Picking the asset
    /// shown on the other side moves this side's previous asset there.
    pub fn select_asset(&mut self, id: &AssetId) -> Result<(), SwapError> {
        let asset = self
            .assets
            .find(id)
            .cloned()
            .ok_or_else(|| SwapError::UnknownAsset(id.clone()))?;

        let side = self
            .picker
            .take()
            .map(|picker| picker.side)
            .unwrap_or(Side::Bottom);

        let (this, other) = match side {
            Side::Top => (&mut self.top, &mut self.bottom),
            Side::Bottom => (&mut self.bottom, &mut self.top),
        };
        if other.as_ref().map(|x| &x.id) == Some(id) {
            *other = this.clone();
        }
        *this = Some(asset);

        self.recompute_bottom()
    }

    /// Exchanges the selected assets and the amounts, then converts in the new orientation
    pub fn swap(&mut self) -> Result<(), SwapError> {
        std::mem::swap(&mut self.top, &mut self.bottom);
        std::mem::swap(&mut self.top_amount, &mut self.bottom_amount);

        self.recompute_bottom()
    }

    pub fn assets(&self) -> &AssetList {
        &self.assets
    }

    pub fn top(&self) -> Option<&Asset> {
        self.top.as_ref()
    }

    pub fn bottom(&self) -> Option<&Asset> {
        self.bottom.as_ref()
    }

    pub fn top_amount(&self) -> &str {
        &self.top_amount
    }

    pub fn bottom_amount(&self) -> &str {
        &self.bottom_amount
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn picker(&self) -> Option<&TokenPicker> {
        self.picker.as_ref()
    }

    fn recompute_bottom(&mut self) -> Result<(), SwapError> {
        if let Some(amount) = convert(&self.top_amount, self.top.as_ref(), self.bottom.as_ref())? {
            self.bottom_amount = amount;
        }

        Ok(())
    }

    fn recompute_top(&mut self) -> Result<(), SwapError> {
        if let Some(amount) = convert(&self.bottom_amount, self.bottom.as_ref(), self.top.as_ref())?
        {
            self.top_amount = amount;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::asset::Price;
    use crate::core::services::asset_loader::LOAD_FAILED_WARNING;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn asset(id: &str, symbol: &str, name: &str, price: Price) -> Asset {
        Asset::new(id.into(), symbol.into(), name, price)
    }

    fn loaded() -> LoadedAssets {
        LoadedAssets::loaded(AssetList::merge(
            vec![
                asset("choccyswap", "CCY", "ChoccySwap", dec!(0.017)),
                asset("usd", "USD", "US Dollar", dec!(1)),
                asset("ethereum", "ETH", "Ethereum", dec!(3400)),
            ],
            vec![asset("bitcoin", "BTC", "Bitcoin", dec!(68000))],
        ))
    }

    fn session() -> SwapSession {
        let mut session = SwapSession::new(&AssetSettings::default());
        session.load(loaded()).expect("in test");
        session
    }

    fn selected(session: &SwapSession) -> (&str, &str) {
        (
            session.top().expect("in test").id.as_str(),
            session.bottom().expect("in test").id.as_str(),
        )
    }

    #[test]
    fn amounts_are_kept_until_assets_are_loaded() {
        let mut session = SwapSession::new(&AssetSettings::default());

        session.set_top_amount("5").expect("in test");

        assert_eq!(session.top_amount(), "5");
        assert_eq!(session.bottom_amount(), "0");
    }

    #[test]
    fn load_selects_defaults_and_converts_initial_amount() {
        let session = session();

        assert_eq!(selected(&session), ("choccyswap", "usd"));
        assert_eq!(session.top_amount(), "1000.00");
        assert_eq!(session.bottom_amount(), "17.000000");
        assert_eq!(session.warning(), None);
    }

    #[test]
    fn load_without_defaults_takes_first_two_assets() {
        let mut session = SwapSession::new(&AssetSettings::default());

        session
            .load(LoadedAssets::loaded(AssetList::merge(
                vec![
                    asset("ethereum", "ETH", "Ethereum", dec!(3400)),
                    asset("bitcoin", "BTC", "Bitcoin", dec!(68000)),
                ],
                Vec::new(),
            )))
            .expect("in test");

        assert_eq!(selected(&session), ("ethereum", "bitcoin"));
        assert_eq!(session.bottom_amount(), "50.000000");
    }

    #[test]
    fn fallback_load_shows_warning() {
        let mut session = SwapSession::new(&AssetSettings::default());

        session
            .load(LoadedAssets::fallback(&AssetSettings::default()))
            .expect("in test");

        assert_eq!(session.warning(), Some(LOAD_FAILED_WARNING));
        assert_eq!(selected(&session), ("choccyswap", "usd"));
        assert_eq!(session.bottom_amount(), "1000.000000");
    }

    #[test]
    fn editing_either_amount_updates_the_other() {
        let mut session = session();

        session.set_top_amount("2000").expect("in test");
        assert_eq!(session.bottom_amount(), "34.000000");

        session.set_bottom_amount("8.5").expect("in test");
        assert_eq!(session.bottom_amount(), "8.5");
        assert_eq!(session.top_amount(), "500.000000");

        session.set_top_amount("lots").expect("in test");
        assert_eq!(session.bottom_amount(), "0");
    }

    #[test]
    fn selecting_the_other_sides_asset_exchanges_sides() {
        let mut session = session();

        session.open_picker(Side::Top);
        session.select_asset(&"usd".into()).expect("in test");

        assert_eq!(selected(&session), ("usd", "choccyswap"));
        assert_eq!(session.picker(), None);
        assert_eq!(session.bottom_amount(), "58823.529412");
    }

    #[test]
    fn selecting_without_picker_changes_bottom() {
        let mut session = session();

        session.select_asset(&"ethereum".into()).expect("in test");

        assert_eq!(selected(&session), ("choccyswap", "ethereum"));
        assert_eq!(session.bottom_amount(), "0.005000");
    }

    #[test]
    fn selecting_unknown_asset_is_error() {
        let mut session = session();
        session.open_picker(Side::Bottom);

        let result = session.select_asset(&"dogecoin".into());

        assert_eq!(result, Err(SwapError::UnknownAsset("dogecoin".into())));
        assert_eq!(selected(&session), ("choccyswap", "usd"));
        assert!(session.picker().is_some());
    }

    #[test]
    fn swap_exchanges_assets_and_reconverts() {
        let mut session = session();
        session.set_top_amount("1000").expect("in test");

        session.swap().expect("in test");

        assert_eq!(selected(&session), ("usd", "choccyswap"));
        assert_eq!(session.top_amount(), "17.000000");
        assert_eq!(session.bottom_amount(), "1000.000000");
    }

    #[test]
    fn picker_search_filters_visible_assets() {
        let mut session = session();
        assert_eq!(session.visible_assets().len(), 4);

        session.open_picker(Side::Bottom);
        session.set_search_term("coin");
        let visible = session
            .visible_assets()
            .into_iter()
            .map(|x| x.symbol.as_str())
            .collect::<Vec<_>>();
        assert_eq!(visible, vec!["BTC"]);

        session.close_picker();
        assert_eq!(session.visible_assets().len(), 4);
    }

    #[test]
    fn zero_priced_destination_keeps_previous_amount() {
        let mut session = SwapSession::new(&AssetSettings::default());
        session
            .load(LoadedAssets::loaded(AssetList::merge(
                vec![
                    asset("choccyswap", "CCY", "ChoccySwap", dec!(0.017)),
                    asset("usd", "USD", "US Dollar", dec!(1)),
                    asset("broken", "BRK", "Broken", dec!(0)),
                ],
                Vec::new(),
            )))
            .expect("in test");

        let result = session.select_asset(&"broken".into());

        assert_eq!(
            result,
            Err(SwapError::Conversion(ConversionError::ZeroDestinationPrice(
                "broken".into()
            )))
        );
        assert_eq!(selected(&session), ("choccyswap", "broken"));
        assert_eq!(session.bottom_amount(), "17.000000");
    }
}
