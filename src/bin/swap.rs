use std::sync::Arc;

use anyhow::Result;
use ccy_swap_lib::core::assets::asset::AssetId;
use ccy_swap_lib::core::config::{load_settings_or_default, CONFIG_PATH};
use ccy_swap_lib::core::logger::{init_logger, print_info};
use ccy_swap_lib::core::services::asset_loader::AssetLoader;
use ccy_swap_lib::core::services::price_feed::coingecko::CoinGeckoPriceFeed;
use ccy_swap_lib::core::swap::swap_session::{Side, SwapSession};
use clap::Parser;

/// Converts an amount of one token into another at current USD prices
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_PATH)]
    config: String,

    /// Asset id for the top side, the in-house token by default
    #[arg(long)]
    from: Option<String>,

    /// Asset id for the bottom side
    #[arg(long)]
    to: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    /// Treat `--amount` as the bottom side amount
    #[arg(long, default_value_t = false)]
    reverse: bool,

    /// Exchange the sides before converting
    #[arg(long, default_value_t = false)]
    swap: bool,

    /// Load trending coins instead of the top market cap page
    #[arg(long, default_value_t = false)]
    trending: bool,

    /// List assets matching the term and exit
    #[arg(long)]
    search: Option<String>,

    /// Query the price API without the proxy
    #[arg(long, default_value_t = false)]
    direct: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let mut settings = load_settings_or_default(&cli.config)?;
    if cli.direct {
        settings.price_feed.proxy_url = None;
    }

    let price_feed = Arc::new(CoinGeckoPriceFeed::from_settings(&settings.price_feed));
    let loader = AssetLoader::new(price_feed, settings.price_feed, settings.assets.clone());

    let loaded = if cli.trending {
        loader.load_trending_assets().await
    } else {
        loader.load_top_market_assets().await
    };

    let mut session = SwapSession::new(&settings.assets);
    session.load(loaded)?;

    if let Some(warning) = session.warning() {
        print_info(warning);
    }

    if let Some(term) = &cli.search {
        session.open_picker(Side::Bottom);
        session.set_search_term(term);
        for asset in session.visible_assets() {
            println!("{:<16} {}", asset.id.as_str(), asset);
        }
        return Ok(());
    }

    if let Some(from) = &cli.from {
        session.open_picker(Side::Top);
        session.select_asset(&AssetId::from(from.as_str()))?;
    }
    if let Some(to) = &cli.to {
        session.open_picker(Side::Bottom);
        session.select_asset(&AssetId::from(to.as_str()))?;
    }
    if cli.swap {
        session.swap()?;
    }

    match (&cli.amount, cli.reverse) {
        (Some(amount), false) => session.set_top_amount(amount)?,
        (Some(amount), true) => session.set_bottom_amount(amount)?,
        (None, _) => {}
    }

    let symbol = |side: Side| {
        let asset = match side {
            Side::Top => session.top(),
            Side::Bottom => session.bottom(),
        };
        asset.map(|x| x.symbol.to_string()).unwrap_or_default()
    };

    println!(
        "{} {} = {} {}",
        session.top_amount(),
        symbol(Side::Top),
        session.bottom_amount(),
        symbol(Side::Bottom)
    );

    Ok(())
}
