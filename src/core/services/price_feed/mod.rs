pub mod coingecko;
pub mod price_feed;
pub mod responses;
