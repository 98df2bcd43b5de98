pub mod asset_loader;
pub mod price_feed;
pub mod usd_converter;
